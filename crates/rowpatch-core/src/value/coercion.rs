//! Conversion of loosely-typed input into native field values.
//!
//! Every function here is pure: the result depends only on the target type
//! and the raw input.

use crate::{
    model::FieldKind,
    value::{ScalarType, Value},
};
use serde_json::{Number, Value as JsonValue};
use thiserror::Error as ThisError;

///
/// CoercionError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CoercionError {
    #[error("value '{value}' is not a valid {expected}")]
    InvalidValue {
        expected: ScalarType,
        value: String,
    },

    #[error("value '{value}' is out of range for {expected}")]
    OutOfRange {
        expected: ScalarType,
        value: String,
    },

    #[error("null is not a valid {expected}")]
    Null { expected: ScalarType },

    #[error("expected an array of {len} {expected} values, found '{value}'")]
    NotAnArray {
        expected: ScalarType,
        len: usize,
        value: String,
    },

    #[error("expected {expected} array elements, found {actual}")]
    ArrayLength { expected: usize, actual: usize },

    #[error("array element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<Self>,
    },
}

impl CoercionError {
    fn invalid(expected: ScalarType, value: impl ToString) -> Self {
        Self::InvalidValue {
            expected,
            value: value.to_string(),
        }
    }

    fn out_of_range(expected: ScalarType, value: impl ToString) -> Self {
        Self::OutOfRange {
            expected,
            value: value.to_string(),
        }
    }

    fn at(self, index: usize) -> Self {
        Self::Element {
            index,
            source: Box::new(self),
        }
    }
}

// ---------------------------------------------------------------------------
// Scalar conversion
// ---------------------------------------------------------------------------

/// Convert one loosely-typed JSON scalar into `ty`.
pub fn coerce_scalar(ty: ScalarType, raw: &JsonValue) -> Result<Value, CoercionError> {
    match raw {
        JsonValue::Null => Err(CoercionError::Null { expected: ty }),
        JsonValue::Number(n) => coerce_number(ty, n),
        JsonValue::String(s) => coerce_token(ty, s),
        JsonValue::Bool(b) if ty == ScalarType::Text => Ok(Value::Text(b.to_string())),
        other => Err(CoercionError::invalid(ty, other)),
    }
}

/// Convert one textual token into `ty`.
///
/// Numeric types accept surrounding whitespace; floats must be finite.
pub fn coerce_token(ty: ScalarType, token: &str) -> Result<Value, CoercionError> {
    let trimmed = token.trim();
    let parsed = match ty {
        ScalarType::Int8 => trimmed.parse().map(Value::Int8).ok(),
        ScalarType::Uint8 => trimmed.parse().map(Value::Uint8).ok(),
        ScalarType::Int16 => trimmed.parse().map(Value::Int16).ok(),
        ScalarType::Uint16 => trimmed.parse().map(Value::Uint16).ok(),
        ScalarType::Int32 => trimmed.parse().map(Value::Int32).ok(),
        ScalarType::Uint32 => trimmed.parse().map(Value::Uint32).ok(),
        ScalarType::Int64 => trimmed.parse().map(Value::Int64).ok(),
        ScalarType::Uint64 => trimmed.parse().map(Value::Uint64).ok(),
        ScalarType::Float32 => trimmed
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Value::Float32),
        ScalarType::Float64 => trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Value::Float64),
        ScalarType::Text => return Ok(Value::Text(token.to_string())),
    };

    parsed.ok_or_else(|| CoercionError::invalid(ty, token))
}

/// Convert an integer from the reference domain into `ty`.
#[allow(clippy::cast_precision_loss)]
pub fn coerce_integer(ty: ScalarType, v: i64) -> Result<Value, CoercionError> {
    let range = || CoercionError::out_of_range(ty, v);

    Ok(match ty {
        ScalarType::Int8 => Value::Int8(i8::try_from(v).map_err(|_| range())?),
        ScalarType::Uint8 => Value::Uint8(u8::try_from(v).map_err(|_| range())?),
        ScalarType::Int16 => Value::Int16(i16::try_from(v).map_err(|_| range())?),
        ScalarType::Uint16 => Value::Uint16(u16::try_from(v).map_err(|_| range())?),
        ScalarType::Int32 => Value::Int32(i32::try_from(v).map_err(|_| range())?),
        ScalarType::Uint32 => Value::Uint32(u32::try_from(v).map_err(|_| range())?),
        ScalarType::Int64 => Value::Int64(v),
        ScalarType::Uint64 => Value::Uint64(u64::try_from(v).map_err(|_| range())?),
        ScalarType::Float32 => Value::Float32(v as f32),
        ScalarType::Float64 => Value::Float64(v as f64),
        ScalarType::Text => Value::Text(v.to_string()),
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn coerce_number(ty: ScalarType, n: &Number) -> Result<Value, CoercionError> {
    if let Some(v) = n.as_i64() {
        return coerce_integer(ty, v);
    }

    if let Some(v) = n.as_u64() {
        // only values above i64::MAX reach this branch
        return match ty {
            ScalarType::Uint64 => Ok(Value::Uint64(v)),
            ScalarType::Float32 => Ok(Value::Float32(v as f32)),
            ScalarType::Float64 => Ok(Value::Float64(v as f64)),
            ScalarType::Text => Ok(Value::Text(v.to_string())),
            _ => Err(CoercionError::out_of_range(ty, v)),
        };
    }

    let Some(v) = n.as_f64() else {
        return Err(CoercionError::invalid(ty, n));
    };

    match ty {
        ScalarType::Float64 => Ok(Value::Float64(v)),
        ScalarType::Float32 => {
            if v.abs() > f64::from(f32::MAX) {
                Err(CoercionError::out_of_range(ty, n))
            } else {
                Ok(Value::Float32(v as f32))
            }
        }
        ScalarType::Text => Ok(Value::Text(n.to_string())),
        _ if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 => {
            coerce_integer(ty, v as i64)
        }
        _ => Err(CoercionError::invalid(ty, n)),
    }
}

// ---------------------------------------------------------------------------
// Array conversion
// ---------------------------------------------------------------------------

/// Build a fixed-length array of `ty` from textual tokens.
///
/// The token count must equal `size`; any element failure fails the array.
pub fn coerce_array<S: AsRef<str>>(
    ty: ScalarType,
    size: usize,
    tokens: &[S],
) -> Result<Value, CoercionError> {
    if tokens.len() != size {
        return Err(CoercionError::ArrayLength {
            expected: size,
            actual: tokens.len(),
        });
    }

    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| coerce_token(ty, token.as_ref()).map_err(|err| err.at(index)))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

/// Build a fixed-length array of `ty` from a JSON array.
///
/// Each element coerces the way a lone scalar of `ty` would, so `[2.0, "3"]`
/// fills an integer array.
pub fn coerce_json_array(
    ty: ScalarType,
    size: usize,
    raw: &JsonValue,
) -> Result<Value, CoercionError> {
    let JsonValue::Array(items) = raw else {
        return Err(CoercionError::NotAnArray {
            expected: ty,
            len: size,
            value: raw.to_string(),
        });
    };

    if items.len() != size {
        return Err(CoercionError::ArrayLength {
            expected: size,
            actual: items.len(),
        });
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| coerce_scalar(ty, item).map_err(|err| err.at(index)))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

// ---------------------------------------------------------------------------
// Field-kind dispatch
// ---------------------------------------------------------------------------

/// Convert a JSON value into whatever `kind` stores.
pub fn coerce_json(kind: FieldKind, raw: &JsonValue) -> Result<Value, CoercionError> {
    match kind {
        FieldKind::Scalar(ty) => coerce_scalar(ty, raw),
        FieldKind::Array { element, len } => coerce_json_array(element, len, raw),
    }
}

/// Convert an already-native value into whatever `kind` stores.
///
/// Values that already have the exact shape pass through untouched.
pub fn coerce_native(kind: FieldKind, value: &Value) -> Result<Value, CoercionError> {
    match (kind, value) {
        (FieldKind::Scalar(ty), _) if value.scalar_type() == Some(ty) => Ok(value.clone()),
        (FieldKind::Scalar(ty), Value::Array(_)) => Err(CoercionError::invalid(ty, value)),
        (FieldKind::Scalar(ty), _) => coerce_scalar(ty, &value.to_json()),
        (FieldKind::Array { element, len }, Value::Array(items)) => {
            if items.len() != len {
                return Err(CoercionError::ArrayLength {
                    expected: len,
                    actual: items.len(),
                });
            }

            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    coerce_native(FieldKind::Scalar(element), item).map_err(|err| err.at(index))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        (FieldKind::Array { element, len }, _) => Err(CoercionError::NotAnArray {
            expected: element,
            len,
            value: value.to_string(),
        }),
    }
}
