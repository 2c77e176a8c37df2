//! Field address resolution.
//!
//! Patch documents name columns flatly. A column either names a declared
//! field exactly, or names one element of an array field by appending the
//! element index in decimal: `Flags3` is element 3 of `Flags`. Exact names
//! always win, so a scalar field literally called `Cost2` is never read as
//! element 2 of some `Cost` array.

use crate::{
    model::{FieldKind, RecordModel},
    value::ScalarType,
};
use thiserror::Error as ThisError;

///
/// AddressError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum AddressError {
    #[error("record '{record}' has no field matching column '{column}'")]
    UnknownField { record: String, column: String },

    #[error("index {index} is out of bounds for array field '{field}' of length {len}")]
    IndexOutOfBounds {
        field: String,
        index: usize,
        len: usize,
    },

    #[error("uninitialized array for field: {column}")]
    UninitializedArray { column: String },

    #[error("field '{field}' expects {expected}, found '{found}'")]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        found: String,
    },

    #[error("primary key field '{field}' cannot be written through a column")]
    PrimaryKey { field: String },
}

///
/// FieldAddress
///
/// A resolved column: the slot of a declared field plus an optional
/// element index into that field when it is an array.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldAddress {
    position: usize,
    kind: FieldKind,
    index: Option<usize>,
}

impl FieldAddress {
    /// Resolve a user-facing column name against a record model.
    pub fn resolve(model: &RecordModel, column: &str) -> Result<Self, AddressError> {
        if let Some(position) = model.position(column) {
            return Ok(Self {
                position,
                kind: model.fields()[position].kind,
                index: None,
            });
        }

        let unknown = || AddressError::UnknownField {
            record: model.name().to_string(),
            column: column.to_string(),
        };

        let mut prefix = column;
        let mut index = 0usize;
        let mut weight = 1usize;

        while let Some(digit) = prefix.chars().next_back().and_then(|c| c.to_digit(10)) {
            prefix = &prefix[..prefix.len() - 1];
            index = (digit as usize)
                .checked_mul(weight)
                .and_then(|v| v.checked_add(index))
                .ok_or_else(unknown)?;

            if prefix.is_empty() {
                break;
            }

            if let Some(position) = model.position(prefix) {
                let field = &model.fields()[position];
                if let FieldKind::Array { len, .. } = field.kind {
                    if index >= len {
                        return Err(AddressError::IndexOutOfBounds {
                            field: field.name.clone(),
                            index,
                            len,
                        });
                    }

                    return Ok(Self {
                        position,
                        kind: field.kind,
                        index: Some(index),
                    });
                }
            }

            weight = match weight.checked_mul(10) {
                Some(next) => next,
                None => break,
            };
        }

        Err(unknown())
    }

    /// Slot position of the addressed field in its record model.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Element index when the address points inside an array field.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    /// Declared kind of the whole addressed field.
    #[must_use]
    pub const fn field_kind(&self) -> FieldKind {
        self.kind
    }

    /// Kind of the value stored at this address.
    ///
    /// Element addresses store one scalar of the array's element type; a
    /// bare field address stores the field's declared kind.
    #[must_use]
    pub const fn target_kind(&self) -> FieldKind {
        match self.index {
            Some(_) => FieldKind::Scalar(self.kind.element_type()),
            None => self.kind,
        }
    }

    #[must_use]
    pub const fn element_type(&self) -> ScalarType {
        self.kind.element_type()
    }

    #[must_use]
    pub fn field_name<'a>(&self, model: &'a RecordModel) -> &'a str {
        &model.fields()[self.position].name
    }
}

/// Resolve a column and return the scalar type stored at it.
pub fn element_type(model: &RecordModel, column: &str) -> Result<ScalarType, AddressError> {
    FieldAddress::resolve(model, column).map(|addr| addr.element_type())
}

///
/// TESTS
///
