use super::*;
use crate::model::FieldKind;
use proptest::prelude::*;
use serde_json::json;

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

#[test]
fn numbers_coerce_into_each_integer_width() {
    assert_eq!(coerce_scalar(ScalarType::Int8, &json!(-5)), Ok(Value::Int8(-5)));
    assert_eq!(coerce_scalar(ScalarType::Uint16, &json!(65_535)), Ok(Value::Uint16(65_535)));
    assert_eq!(coerce_scalar(ScalarType::Int64, &json!(i64::MIN)), Ok(Value::Int64(i64::MIN)));
    assert_eq!(coerce_scalar(ScalarType::Uint64, &json!(u64::MAX)), Ok(Value::Uint64(u64::MAX)));
}

#[test]
fn out_of_range_integers_fail() {
    assert!(matches!(
        coerce_scalar(ScalarType::Uint8, &json!(256)),
        Err(CoercionError::OutOfRange { .. })
    ));
    assert!(matches!(
        coerce_scalar(ScalarType::Uint32, &json!(-1)),
        Err(CoercionError::OutOfRange { .. })
    ));
    assert!(matches!(
        coerce_scalar(ScalarType::Int64, &json!(u64::MAX)),
        Err(CoercionError::OutOfRange { .. })
    ));
}

#[test]
fn numeric_strings_are_accepted() {
    assert_eq!(coerce_scalar(ScalarType::Int32, &json!(" 42 ")), Ok(Value::Int32(42)));
    assert_eq!(coerce_scalar(ScalarType::Float64, &json!("0.25")), Ok(Value::Float64(0.25)));
}

#[test]
fn garbage_strings_are_invalid() {
    assert_eq!(
        coerce_scalar(ScalarType::Int32, &json!("abc")),
        Err(CoercionError::InvalidValue {
            expected: ScalarType::Int32,
            value: "abc".to_string(),
        })
    );
    assert!(coerce_scalar(ScalarType::Float32, &json!("NaN")).is_err());
}

#[test]
fn integral_floats_coerce_to_integers() {
    assert_eq!(coerce_scalar(ScalarType::Int16, &json!(7.0)), Ok(Value::Int16(7)));
    assert!(coerce_scalar(ScalarType::Int16, &json!(7.5)).is_err());
}

#[test]
fn text_accepts_strings_numbers_and_bools() {
    assert_eq!(coerce_scalar(ScalarType::Text, &json!("hi")), Ok(Value::from("hi")));
    assert_eq!(coerce_scalar(ScalarType::Text, &json!(12)), Ok(Value::from("12")));
    assert_eq!(coerce_scalar(ScalarType::Text, &json!(true)), Ok(Value::from("true")));
}

#[test]
fn null_and_objects_are_rejected() {
    assert_eq!(
        coerce_scalar(ScalarType::Int32, &JsonValue::Null),
        Err(CoercionError::Null {
            expected: ScalarType::Int32
        })
    );
    assert!(coerce_scalar(ScalarType::Int32, &json!({ "a": 1 })).is_err());
    assert!(coerce_scalar(ScalarType::Int32, &json!(true)).is_err());
}

#[test]
fn float32_rejects_values_beyond_its_range() {
    assert!(matches!(
        coerce_scalar(ScalarType::Float32, &json!(1.0e300)),
        Err(CoercionError::OutOfRange { .. })
    ));
}

// ---------------------------------------------------------------------------
// Arrays
// ---------------------------------------------------------------------------

#[test]
fn token_arrays_need_exact_length() {
    assert_eq!(
        coerce_array(ScalarType::Int32, 3, &["1", "2", "3"]),
        Ok(Value::from(vec![1_i32, 2, 3]))
    );
    assert_eq!(
        coerce_array(ScalarType::Int32, 3, &["1", "2"]),
        Err(CoercionError::ArrayLength {
            expected: 3,
            actual: 2
        })
    );
}

#[test]
fn bad_element_names_its_index() {
    let err = coerce_array(ScalarType::Uint8, 2, &["1", "x"]).unwrap_err();

    assert!(matches!(err, CoercionError::Element { index: 1, .. }));
    assert_eq!(err.to_string(), "array element 1: value 'x' is not a valid uint8");
}

#[test]
fn json_arrays_mix_numbers_and_strings() {
    assert_eq!(
        coerce_json_array(ScalarType::Int16, 2, &json!([1, "2"])),
        Ok(Value::from(vec![1_i16, 2]))
    );
    assert!(matches!(
        coerce_json_array(ScalarType::Int16, 2, &json!(1)),
        Err(CoercionError::NotAnArray { len: 2, .. })
    ));
}

#[test]
fn json_array_elements_coerce_like_scalars() {
    assert_eq!(
        coerce_json_array(ScalarType::Int32, 2, &json!([2.0, 3])),
        Ok(Value::from(vec![2_i32, 3]))
    );
    assert_eq!(
        coerce_json_array(ScalarType::Int32, 2, &json!([2.0, 3])),
        coerce_array(ScalarType::Int32, 2, &["2", "3"])
    );
    assert!(matches!(
        coerce_json_array(ScalarType::Int32, 2, &json!([1, 2.5])),
        Err(CoercionError::Element { index: 1, .. })
    ));
    assert!(matches!(
        coerce_json_array(ScalarType::Int32, 2, &json!([1, 2, 3])),
        Err(CoercionError::ArrayLength { expected: 2, actual: 3 })
    ));
}

#[test]
fn coerce_json_dispatches_on_field_kind() {
    let array = FieldKind::Array {
        element: ScalarType::Int32,
        len: 2,
    };

    assert_eq!(
        coerce_json(FieldKind::Scalar(ScalarType::Int32), &json!("3")),
        Ok(Value::Int32(3))
    );
    assert_eq!(coerce_json(array, &json!([3, 4])), Ok(Value::from(vec![3_i32, 4])));
    assert!(coerce_json(array, &json!(3)).is_err());
}

// ---------------------------------------------------------------------------
// Native values
// ---------------------------------------------------------------------------

#[test]
fn native_values_of_the_right_type_pass_through() {
    let kind = FieldKind::Scalar(ScalarType::Uint32);

    assert_eq!(coerce_native(kind, &Value::Uint32(9)), Ok(Value::Uint32(9)));
    assert_eq!(coerce_native(kind, &Value::Int64(9)), Ok(Value::Uint32(9)));
    assert!(coerce_native(kind, &Value::Int64(-9)).is_err());
}

#[test]
fn native_arrays_convert_elementwise() {
    let kind = FieldKind::Array {
        element: ScalarType::Int64,
        len: 2,
    };

    assert_eq!(
        coerce_native(kind, &Value::from(vec![1_i32, 2])),
        Ok(Value::from(vec![1_i64, 2]))
    );
    assert!(coerce_native(kind, &Value::Int64(1)).is_err());
}

// ---------------------------------------------------------------------------
// Value helpers
// ---------------------------------------------------------------------------

#[test]
fn reference_int_accepts_integer_like_values() {
    assert_eq!(Value::Uint16(4).to_reference_int(), Some(4));
    assert_eq!(Value::Float64(4.0).to_reference_int(), Some(4));
    assert_eq!(Value::Float64(4.5).to_reference_int(), None);
    assert_eq!(Value::from("17").to_reference_int(), Some(17));
    assert_eq!(Value::from("x").to_reference_int(), None);
    assert_eq!(Value::Uint64(u64::MAX).to_reference_int(), None);
    assert_eq!(Value::from(vec![1_i32]).to_reference_int(), None);
}

#[test]
fn defaults_match_type() {
    assert_eq!(ScalarType::Int8.default_value(), Value::Int8(0));
    assert_eq!(ScalarType::Float32.default_value(), Value::Float32(0.0));
    assert_eq!(ScalarType::Text.default_value(), Value::from(""));
}

proptest! {
    #[test]
    fn integer_coercion_matches_try_from(v in any::<i64>()) {
        prop_assert_eq!(
            coerce_integer(ScalarType::Int16, v).is_ok(),
            i16::try_from(v).is_ok()
        );
        prop_assert_eq!(
            coerce_integer(ScalarType::Uint32, v).is_ok(),
            u32::try_from(v).is_ok()
        );
    }

    #[test]
    fn in_range_tokens_parse_to_the_same_number(v in any::<i32>()) {
        prop_assert_eq!(coerce_token(ScalarType::Int32, &v.to_string()), Ok(Value::Int32(v)));
        prop_assert_eq!(
            coerce_scalar(ScalarType::Int32, &json!(v.to_string())),
            coerce_scalar(ScalarType::Int32, &json!(v))
        );
    }
}
