//! Structural equality over JSON values
//!
//! `None` stands for an absent value (a key missing on one side of a diff)
//! and is distinct from an explicit JSON `null`.

use serde_json::{Number, Value};

/// Recursively compare two optional JSON values
pub fn deep_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => values_equal(a, b),
        _ => false,
    }
}

/// Recursively compare two JSON values
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => false,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }

    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }

    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reflexive_and_symmetric() {
        let values = vec![
            json!(null),
            json!(true),
            json!(42),
            json!("text"),
            json!([1, [2, 3], {"a": null}]),
            json!({"tags": {"Name": "web"}, "ports": [80, 443]}),
        ];

        for a in &values {
            assert!(values_equal(a, a));
            for b in &values {
                assert_eq!(values_equal(a, b), values_equal(b, a));
            }
        }
    }

    #[test]
    fn test_null_and_absent_are_distinct() {
        let null = json!(null);
        assert!(!deep_equal(Some(&null), None));
        assert!(!deep_equal(None, Some(&null)));
        assert!(deep_equal(None, None));
    }

    #[test]
    fn test_no_type_coercion() {
        assert!(!values_equal(&json!("1"), &json!(1)));
        assert!(!values_equal(&json!(0), &json!(false)));
        assert!(!values_equal(&json!(""), &json!(null)));
    }

    #[test]
    fn test_numbers_compare_by_value() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(!values_equal(&json!(1), &json!(2)));
        assert!(values_equal(&json!(-3), &json!(-3)));
    }

    #[test]
    fn test_arrays_compare_length_and_order() {
        assert!(!values_equal(&json!([1, 2]), &json!([1, 2, 3])));
        assert!(!values_equal(&json!([1, 2]), &json!([2, 1])));
    }

    #[test]
    fn test_objects_compare_key_sets() {
        assert!(!values_equal(&json!({"a": 1}), &json!({"a": 1, "b": null})));
        assert!(values_equal(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1})));
    }
}
