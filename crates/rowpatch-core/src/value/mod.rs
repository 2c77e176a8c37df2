mod coercion;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value as JsonValue};
use std::fmt;

// re-exports
pub use coercion::{
    CoercionError, coerce_array, coerce_integer, coerce_json, coerce_json_array, coerce_native,
    coerce_scalar, coerce_token,
};

///
/// ScalarType
///
/// Closed set of native element types a record field can declare.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float32,
    Float64,
    Text,
}

impl ScalarType {
    /// Stable human-readable type label for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Uint8 => "uint8",
            Self::Int16 => "int16",
            Self::Uint16 => "uint16",
            Self::Int32 => "int32",
            Self::Uint32 => "uint32",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Text => "text",
        }
    }

    #[must_use]
    pub const fn is_integer(self) -> bool {
        !matches!(self, Self::Float32 | Self::Float64 | Self::Text)
    }

    /// Value a freshly constructed row carries for this type.
    #[must_use]
    pub fn default_value(self) -> Value {
        match self {
            Self::Int8 => Value::Int8(0),
            Self::Uint8 => Value::Uint8(0),
            Self::Int16 => Value::Int16(0),
            Self::Uint16 => Value::Uint16(0),
            Self::Int32 => Value::Int32(0),
            Self::Uint32 => Value::Uint32(0),
            Self::Int64 => Value::Int64(0),
            Self::Uint64 => Value::Uint64(0),
            Self::Float32 => Value::Float32(0.0),
            Self::Float64 => Value::Float64(0.0),
            Self::Text => Value::Text(String::new()),
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

///
/// Value
///
/// Native field value as stored on a row.
/// `Array` holds the fixed-length contents of an array field; its elements
/// all share the field's declared element type.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Value {
    Int8(i8),
    Uint8(u8),
    Int16(i16),
    Uint16(u16),
    Int32(i32),
    Uint32(u32),
    Int64(i64),
    Uint64(u64),
    Float32(f32),
    Float64(f64),
    Text(String),
    Array(Vec<Self>),
}

impl Value {
    /// Scalar type of this value, `None` for arrays.
    #[must_use]
    pub const fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            Self::Int8(_) => Some(ScalarType::Int8),
            Self::Uint8(_) => Some(ScalarType::Uint8),
            Self::Int16(_) => Some(ScalarType::Int16),
            Self::Uint16(_) => Some(ScalarType::Uint16),
            Self::Int32(_) => Some(ScalarType::Int32),
            Self::Uint32(_) => Some(ScalarType::Uint32),
            Self::Int64(_) => Some(ScalarType::Int64),
            Self::Uint64(_) => Some(ScalarType::Uint64),
            Self::Float32(_) => Some(ScalarType::Float32),
            Self::Float64(_) => Some(ScalarType::Float64),
            Self::Text(_) => Some(ScalarType::Text),
            Self::Array(_) => None,
        }
    }

    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Convert an integer-like value into the reference domain.
    ///
    /// Floats only convert when integral; text only when it parses as a
    /// whole number. Arrays never convert.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn to_reference_int(&self) -> Option<i64> {
        match self {
            Self::Int8(v) => Some(i64::from(*v)),
            Self::Uint8(v) => Some(i64::from(*v)),
            Self::Int16(v) => Some(i64::from(*v)),
            Self::Uint16(v) => Some(i64::from(*v)),
            Self::Int32(v) => Some(i64::from(*v)),
            Self::Uint32(v) => Some(i64::from(*v)),
            Self::Int64(v) => Some(*v),
            Self::Uint64(v) => i64::try_from(*v).ok(),
            Self::Float32(v) => integral_f64(f64::from(*v)),
            Self::Float64(v) => integral_f64(*v),
            Self::Text(v) => v.trim().parse().ok(),
            Self::Array(_) => None,
        }
    }

    /// Loosely-typed JSON rendering, used for diagnostics and file encoding.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Int8(v) => JsonValue::from(*v),
            Self::Uint8(v) => JsonValue::from(*v),
            Self::Int16(v) => JsonValue::from(*v),
            Self::Uint16(v) => JsonValue::from(*v),
            Self::Int32(v) => JsonValue::from(*v),
            Self::Uint32(v) => JsonValue::from(*v),
            Self::Int64(v) => JsonValue::from(*v),
            Self::Uint64(v) => JsonValue::from(*v),
            Self::Float32(v) => float_json(f64::from(*v)),
            Self::Float64(v) => float_json(*v),
            Self::Text(v) => JsonValue::String(v.clone()),
            Self::Array(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn integral_f64(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

fn float_json(v: f64) -> JsonValue {
    Number::from_f64(v).map_or(JsonValue::Null, JsonValue::Number)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int8(v) => write!(f, "{v}"),
            Self::Uint8(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::Uint16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Uint32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Uint64(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! impl_value_from {
    ( $( $ty:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_value_from! {
    i8 => Int8,
    u8 => Uint8,
    i16 => Int16,
    u16 => Uint16,
    i32 => Int32,
    u32 => Uint32,
    i64 => Int64,
    u64 => Uint64,
    f32 => Float32,
    f64 => Float64,
    String => Text,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}
