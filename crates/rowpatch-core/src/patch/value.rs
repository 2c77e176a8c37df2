use crate::{
    model::FieldKind,
    value::{CoercionError, Value, coerce_json, coerce_native},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::fmt;

///
/// PatchValue
///
/// Column or search value carried by an instruction.
/// Decoded documents always produce `Loose`; embedders building patches in
/// code may hand over `Native` values directly.
///

#[derive(Clone, Debug, PartialEq)]
pub enum PatchValue {
    Native(Value),
    Loose(JsonValue),
}

impl PatchValue {
    /// Convert into the value a field of `kind` stores.
    pub fn coerce(&self, kind: FieldKind) -> Result<Value, CoercionError> {
        match self {
            Self::Native(value) => coerce_native(kind, value),
            Self::Loose(raw) => coerce_json(kind, raw),
        }
    }
}

impl fmt::Display for PatchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(value) => write!(f, "{value}"),
            Self::Loose(JsonValue::String(s)) => f.write_str(s),
            Self::Loose(raw) => write!(f, "{raw}"),
        }
    }
}

impl From<Value> for PatchValue {
    fn from(value: Value) -> Self {
        Self::Native(value)
    }
}

impl From<JsonValue> for PatchValue {
    fn from(raw: JsonValue) -> Self {
        Self::Loose(raw)
    }
}

impl Serialize for PatchValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Native(value) => value.to_json().serialize(serializer),
            Self::Loose(raw) => raw.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for PatchValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        JsonValue::deserialize(deserializer).map(Self::Loose)
    }
}
