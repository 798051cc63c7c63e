//! Shared generators for definition values.

use definition_factory::{Mapping, Value};
use proptest::prelude::*;

pub fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::null()),
        any::<bool>().prop_map(Value::bool),
        (-1000i64..1000).prop_map(Value::int),
        "[a-z ]{0,6}".prop_map(Value::string),
    ]
}

/// Keys biased towards the structure discriminators so sequences of records
/// show up.
pub fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("section".to_string()),
        Just("subsection".to_string()),
        "[a-d]",
    ]
}

pub fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
            prop::collection::btree_map(key(), inner, 0..4)
                .prop_map(|map: Mapping| Value::Mapping(map)),
        ]
    })
}

/// A record keyed by `section`.
pub fn record(section: &str, value: i64) -> Value {
    let mut map = Mapping::new();
    map.insert("section".to_string(), Value::string(section));
    map.insert("value".to_string(), Value::int(value));
    Value::Mapping(map)
}

/// Keep the first occurrence of each key.
pub fn dedup(keys: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::BTreeSet::new();
    keys.into_iter().filter(|k| seen.insert(k.clone())).collect()
}
