//! Runtime record model.
//!
//! A `RecordModel` is the explicit, per-file description of a row layout:
//! an ordered field list where each field is tagged as a scalar or a
//! fixed-length array, plus the field acting as primary identifier. It is
//! built once per opened store from whatever schema source the storage
//! provider reads, and shared by every row of that store.

mod field;

pub use field::{FieldKind, FieldModel};

use crate::value::ScalarType;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// ModelError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ModelError {
    #[error("record '{record}' declares no fields")]
    NoFields { record: String },

    #[error("record '{record}' declares a field with an empty name")]
    EmptyFieldName { record: String },

    #[error("record '{record}' declares field '{field}' more than once")]
    DuplicateField { record: String, field: String },

    #[error("record '{record}' declares zero-length array field '{field}'")]
    EmptyArray { record: String, field: String },

    #[error("record '{record}' has no primary key field '{field}'")]
    UnknownPrimaryKey { record: String, field: String },

    #[error("record '{record}' primary key '{field}' must be an integer scalar, found {kind}")]
    InvalidPrimaryKey {
        record: String,
        field: String,
        kind: String,
    },
}

///
/// RecordModel
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "RecordModelWire", into = "RecordModelWire")]
pub struct RecordModel {
    name: String,
    fields: Vec<FieldModel>,
    primary_key: usize,
}

impl RecordModel {
    /// Build a model whose primary key is the first declared field.
    pub fn new(name: impl Into<String>, fields: Vec<FieldModel>) -> Result<Self, ModelError> {
        let name = name.into();
        let Some(first) = fields.first() else {
            return Err(ModelError::NoFields { record: name });
        };
        let primary_key = first.name.clone();

        Self::with_primary_key(name, fields, &primary_key)
    }

    /// Build a model with an explicitly named primary key field.
    pub fn with_primary_key(
        name: impl Into<String>,
        fields: Vec<FieldModel>,
        primary_key: &str,
    ) -> Result<Self, ModelError> {
        let record = name.into();
        if fields.is_empty() {
            return Err(ModelError::NoFields { record });
        }

        for (i, field) in fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(ModelError::EmptyFieldName { record });
            }
            if fields[..i].iter().any(|prev| prev.name == field.name) {
                return Err(ModelError::DuplicateField {
                    record,
                    field: field.name.clone(),
                });
            }
            if matches!(field.kind, FieldKind::Array { len: 0, .. }) {
                return Err(ModelError::EmptyArray {
                    record,
                    field: field.name.clone(),
                });
            }
        }

        let Some(pk) = fields.iter().position(|f| f.name == primary_key) else {
            return Err(ModelError::UnknownPrimaryKey {
                record,
                field: primary_key.to_string(),
            });
        };
        match fields[pk].kind {
            FieldKind::Scalar(ty) if ty.is_integer() => {}
            kind => {
                return Err(ModelError::InvalidPrimaryKey {
                    record,
                    field: primary_key.to_string(),
                    kind: kind.to_string(),
                });
            }
        }

        Ok(Self {
            name: record,
            fields,
            primary_key: pk,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldModel] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Slot position of a field by exact name.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    #[must_use]
    pub const fn primary_key_position(&self) -> usize {
        self.primary_key
    }

    #[must_use]
    pub fn primary_key(&self) -> &FieldModel {
        &self.fields[self.primary_key]
    }

    /// Integer type of the primary key field.
    #[must_use]
    pub fn primary_key_type(&self) -> ScalarType {
        match self.primary_key().kind {
            FieldKind::Scalar(ty) => ty,
            // construction rejects non-scalar keys
            FieldKind::Array { element, .. } => element,
        }
    }
}

///
/// RecordModelWire
/// Serde shape that re-checks model invariants on decode.
///

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordModelWire {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primary_key: Option<String>,
    fields: Vec<FieldModel>,
}

impl TryFrom<RecordModelWire> for RecordModel {
    type Error = ModelError;

    fn try_from(wire: RecordModelWire) -> Result<Self, Self::Error> {
        match wire.primary_key {
            Some(pk) => Self::with_primary_key(wire.name, wire.fields, &pk),
            None => Self::new(wire.name, wire.fields),
        }
    }
}

impl From<RecordModel> for RecordModelWire {
    fn from(model: RecordModel) -> Self {
        let primary_key = Some(model.primary_key().name.clone());

        Self {
            name: model.name,
            primary_key,
            fields: model.fields,
        }
    }
}

///
/// TESTS
///
