//! JSON value tree with non-finite float sanitization.
//!
//! `serde_json::Value` cannot hold `NaN` or `±inf`, but tabular sources
//! routinely produce them. [`Value`] keeps integers and floats apart so the
//! sanitizer only has to look at floats, and preserves object key order.

use serde::Serialize;
use serde::ser::{SerializeMap, SerializeSeq, Serializer};

/// A JSON value tree.
///
/// Objects keep their entries in insertion order. Keys are expected to be
/// unique; nothing here enforces it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Builds an object from `(key, value)` pairs.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// True when no float anywhere in the tree is infinite or NaN.
    pub fn is_clean(&self) -> bool {
        match self {
            Value::Float(f) => f.is_finite(),
            Value::Array(items) => items.iter().all(Value::is_clean),
            Value::Object(entries) => entries.iter().all(|(_, v)| v.is_clean()),
            Value::Null | Value::Bool(_) | Value::Integer(_) | Value::String(_) => true,
        }
    }
}

/// Returns a copy of `value` with every infinite or NaN float replaced by
/// [`Value::Null`].
///
/// The result has the same shape as the input: same keys in the same order,
/// same array lengths. Containers are rebuilt, never modified in place.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::Float(f) if !f.is_finite() => Value::Null,
        Value::Float(f) => Value::Float(*f),
        Value::Null => Value::Null,
        Value::Bool(b) => Value::Bool(*b),
        Value::Integer(i) => Value::Integer(*i),
        Value::String(s) => Value::String(s.clone()),
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        Value::Object(entries) => Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), sanitize(v)))
                .collect(),
        ),
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tree(floats: BoxedStrategy<f64>) -> BoxedStrategy<Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Integer),
            floats.prop_map(Value::Float),
            "[a-z]{0,8}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
                prop::collection::vec(("[a-z]{1,6}", inner), 0..8).prop_map(Value::Object),
            ]
        })
        .boxed()
    }

    fn any_floats() -> BoxedStrategy<f64> {
        prop_oneof![
            any::<f64>(),
            Just(f64::NAN),
            Just(f64::INFINITY),
            Just(f64::NEG_INFINITY),
        ]
        .boxed()
    }

    fn finite_floats() -> BoxedStrategy<f64> {
        (-1.0e12f64..1.0e12).boxed()
    }

    #[test]
    fn replaces_non_finite_floats_in_nested_tree() {
        let input = Value::object([
            ("a", Value::Float(1.0)),
            ("b", Value::Float(f64::INFINITY)),
            (
                "c",
                Value::Array(vec![
                    Value::Integer(1),
                    Value::Float(f64::NAN),
                    Value::from("x"),
                ]),
            ),
        ]);

        let expected = Value::object([
            ("a", Value::Float(1.0)),
            ("b", Value::Null),
            (
                "c",
                Value::Array(vec![Value::Integer(1), Value::Null, Value::from("x")]),
            ),
        ]);

        assert_eq!(sanitize(&input), expected);
    }

    #[test]
    fn negative_infinity_becomes_null() {
        assert_eq!(sanitize(&Value::Float(f64::NEG_INFINITY)), Value::Null);
    }

    #[test]
    fn bare_scalars_pass_through() {
        assert_eq!(sanitize(&Value::Integer(7)), Value::Integer(7));
        assert_eq!(sanitize(&Value::Float(2.5)), Value::Float(2.5));
        assert_eq!(sanitize(&Value::from("inf")), Value::from("inf"));
        assert_eq!(sanitize(&Value::Bool(false)), Value::Bool(false));
        assert_eq!(sanitize(&Value::Null), Value::Null);
        assert_eq!(sanitize(&Value::Float(f64::NAN)), Value::Null);
    }

    #[test]
    fn empty_containers_stay_empty() {
        assert_eq!(sanitize(&Value::Array(vec![])), Value::Array(vec![]));
        assert_eq!(sanitize(&Value::Object(vec![])), Value::Object(vec![]));
    }

    #[test]
    fn key_order_is_preserved() {
        let input = Value::object([
            ("z", Value::Float(f64::NAN)),
            ("a", Value::Integer(1)),
            ("m", Value::Float(0.5)),
        ]);
        let Value::Object(entries) = sanitize(&input) else {
            panic!("expected object");
        };
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn serializes_to_plain_json() {
        let value = sanitize(&Value::object([
            ("qty", Value::Integer(3)),
            ("price", Value::Float(f64::INFINITY)),
            ("name", Value::from("widget")),
        ]));
        let json = serde_json::to_string(&value).expect("serialize");
        assert_eq!(json, r#"{"qty":3,"price":null,"name":"widget"}"#);
    }

    #[test]
    fn converts_from_serde_json() {
        let value = Value::from(serde_json::json!({"n": 1, "f": 1.5, "list": [true, null]}));
        let Value::Object(mut entries) = value.clone() else {
            panic!("expected object, got {value:?}");
        };
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            entries,
            vec![
                ("f".to_string(), Value::Float(1.5)),
                ("list".to_string(), Value::Array(vec![Value::Bool(true), Value::Null])),
                ("n".to_string(), Value::Integer(1)),
            ]
        );
        assert!(value.is_clean());
    }

    proptest! {
        #[test]
        fn sanitized_tree_is_clean(t in tree(any_floats())) {
            prop_assert!(sanitize(&t).is_clean());
        }

        #[test]
        fn identity_on_clean_input(t in tree(finite_floats())) {
            prop_assert_eq!(sanitize(&t), t);
        }

        #[test]
        fn sanitize_is_idempotent(t in tree(any_floats())) {
            let once = sanitize(&t);
            prop_assert_eq!(sanitize(&once), once);
        }
    }
}
