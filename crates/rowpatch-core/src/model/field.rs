use crate::value::ScalarType;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// FieldModel
/// Runtime field metadata for one declared record field.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "FieldModelWire", into = "FieldModelWire")]
pub struct FieldModel {
    /// Field name as used in patch column names.
    pub name: String,
    pub kind: FieldKind,
}

impl FieldModel {
    #[must_use]
    pub fn scalar(name: impl Into<String>, ty: ScalarType) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Scalar(ty),
        }
    }

    #[must_use]
    pub fn array(name: impl Into<String>, element: ScalarType, len: usize) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Array { element, len },
        }
    }
}

///
/// FieldKind
///
/// Tagged storage shape of a field: one scalar, or a fixed-length array of
/// one scalar type.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FieldKind {
    Scalar(ScalarType),
    Array { element: ScalarType, len: usize },
}

impl FieldKind {
    #[must_use]
    pub const fn is_array(self) -> bool {
        matches!(self, Self::Array { .. })
    }

    /// Scalar type of the field, or of its elements for arrays.
    #[must_use]
    pub const fn element_type(self) -> ScalarType {
        match self {
            Self::Scalar(ty) | Self::Array { element: ty, .. } => ty,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(ty) => write!(f, "{ty}"),
            Self::Array { element, len } => write!(f, "{element}[{len}]"),
        }
    }
}

///
/// FieldModelWire
///

#[derive(Deserialize, Serialize)]
struct FieldModelWire {
    name: String,
    #[serde(rename = "type")]
    ty: ScalarType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    len: Option<usize>,
}

impl From<FieldModelWire> for FieldModel {
    fn from(wire: FieldModelWire) -> Self {
        match wire.len {
            Some(len) => Self::array(wire.name, wire.ty, len),
            None => Self::scalar(wire.name, wire.ty),
        }
    }
}

impl From<FieldModel> for FieldModelWire {
    fn from(field: FieldModel) -> Self {
        let (ty, len) = match field.kind {
            FieldKind::Scalar(ty) => (ty, None),
            FieldKind::Array { element, len } => (element, Some(len)),
        };

        Self {
            name: field.name,
            ty,
            len,
        }
    }
}
