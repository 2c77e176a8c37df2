use derive_more::Display;
use std::fmt;
use thiserror::Error as ThisError;

///
/// PatchError
///
/// Terminal failure of one patch run: a stable result code, the component
/// the failure came from, and human-readable diagnostics.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{code}: {}", messages.join(" "))]
pub struct PatchError {
    pub code: PatchResultCode,
    pub origin: ErrorOrigin,
    pub messages: Vec<String>,
}

impl PatchError {
    pub fn new(code: PatchResultCode, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            code,
            origin,
            messages: vec![message.into()],
        }
    }

    /// Construct an error with no diagnostic text.
    #[must_use]
    pub const fn bare(code: PatchResultCode, origin: ErrorOrigin) -> Self {
        Self {
            code,
            origin,
            messages: Vec::new(),
        }
    }

    /// Append a further diagnostic line.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    pub(crate) fn engine(code: PatchResultCode, message: impl Into<String>) -> Self {
        Self::new(code, ErrorOrigin::Engine, message)
    }

    pub(crate) fn store(code: PatchResultCode, message: impl Into<String>) -> Self {
        Self::new(code, ErrorOrigin::Store, message)
    }

    pub(crate) fn value(code: PatchResultCode, message: impl Into<String>) -> Self {
        Self::new(code, ErrorOrigin::Value, message)
    }

    pub(crate) fn address(code: PatchResultCode, message: impl Into<String>) -> Self {
        Self::new(code, ErrorOrigin::Address, message)
    }

    pub(crate) fn reference(code: PatchResultCode, message: impl Into<String>) -> Self {
        Self::new(code, ErrorOrigin::Reference, message)
    }

    #[must_use]
    pub const fn code(&self) -> PatchResultCode {
        self.code
    }

    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    #[must_use]
    pub fn display_with_origin(&self) -> String {
        format!("{}:{}: {}", self.origin, self.code.label(), self.messages.join(" "))
    }
}

impl From<crate::reference::ReferenceError> for PatchError {
    fn from(err: crate::reference::ReferenceError) -> Self {
        Self::reference(PatchResultCode::ReferenceNotFound, err.to_string())
    }
}

impl From<crate::provider::ProviderError> for PatchError {
    fn from(err: crate::provider::ProviderError) -> Self {
        use crate::provider::ProviderError;

        let code = match &err {
            ProviderError::NotFound { .. } => PatchResultCode::FileNotFound,
            ProviderError::Io { .. } | ProviderError::Malformed { .. } => {
                PatchResultCode::StoreLoadFailed
            }
        };

        Self::new(code, ErrorOrigin::Provider, err.to_string())
    }
}

///
/// PatchResultCode
///
/// Stable result taxonomy. Numeric codes are part of the public surface and
/// must not be renumbered.
///

#[repr(u8)]
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum PatchResultCode {
    Ok = 0,
    InvalidArgument = 2,
    InsertingRecordFailed = 3,
    ReferenceNotFound = 4,
    InvalidReferenceName = 5,
    InvalidReferenceField = 6,
    SetValueFailed = 7,
    InvalidLookupInstruction = 8,
    LookupFailed = 9,
    InvalidFieldReference = 10,
    InvalidFieldValue = 11,
    UpdateRecordNotFound = 12,
    FileNotFound = 13,
    StoreLoadFailed = 14,
    StoreWriteFailed = 15,
}

impl PatchResultCode {
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Stable snake_case label for logs and diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::InvalidArgument => "invalid_argument",
            Self::InsertingRecordFailed => "inserting_record_failed",
            Self::ReferenceNotFound => "reference_not_found",
            Self::InvalidReferenceName => "invalid_reference_name",
            Self::InvalidReferenceField => "invalid_reference_field",
            Self::SetValueFailed => "set_value_failed",
            Self::InvalidLookupInstruction => "invalid_lookup_instruction",
            Self::LookupFailed => "lookup_failed",
            Self::InvalidFieldReference => "invalid_field_reference",
            Self::InvalidFieldValue => "invalid_field_value",
            Self::UpdateRecordNotFound => "update_record_not_found",
            Self::FileNotFound => "file_not_found",
            Self::StoreLoadFailed => "store_load_failed",
            Self::StoreWriteFailed => "store_write_failed",
        }
    }
}

///
/// ErrorOrigin
/// Component a failure was raised in. Diagnostic only.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Value,
    Address,
    Reference,
    Store,
    Provider,
    Engine,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Value => "value",
            Self::Address => "address",
            Self::Reference => "reference",
            Self::Store => "store",
            Self::Provider => "provider",
            Self::Engine => "engine",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
