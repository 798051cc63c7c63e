//! Structure-list merger
//!
//! Sequences of records are merged by discriminator (`section`, then
//! `subsection`) rather than by position. The result is the override items
//! in override order, followed by the base items nothing matched, in base
//! order.

use crate::domain::document::TEMPLATE_METADATA_KEYS;
use crate::domain::value::Value;

use super::merge::merge_owned;

/// Record fields that identify an item, in lookup order.
pub const DISCRIMINATOR_KEYS: &[&str] = &["section", "subsection"];

/// Identity of a keyed record: the discriminator field, the kind of its
/// scalar and its text. `section: 1` and `section: "1"` are different
/// records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub field: &'static str,
    pub kind: &'static str,
    pub value: String,
}

/// Discriminator of a record, if it has one.
pub fn record_key(item: &Value) -> Option<RecordKey> {
    let map = item.as_mapping()?;
    DISCRIMINATOR_KEYS.iter().find_map(|&field| {
        let value = map.get(field)?;
        if value.is_null() {
            return None;
        }
        let kind = value.kind();
        value
            .scalar_text()
            .map(|text| RecordKey { field, kind, value: text })
    })
}

pub fn merge_structure(base: Vec<Value>, overlay: Vec<Value>) -> Vec<Value> {
    if overlay.is_empty() {
        return base;
    }

    let mut pool: Vec<Option<(Option<RecordKey>, Value)>> = base
        .into_iter()
        .map(|item| Some((record_key(&item), item)))
        .collect();
    let mut merged = Vec::with_capacity(pool.len() + overlay.len());

    for item in overlay {
        let key = record_key(&item);
        let matched = pool.iter().position(|slot| match (slot, &key) {
            (Some((Some(base_key), _)), Some(key)) => base_key == key,
            // Unkeyed items only absorb an identical base item.
            (Some((None, base_item)), None) => *base_item == item,
            _ => false,
        });

        match matched.and_then(|index| pool[index].take()) {
            Some((_, base_item)) => merged.push(merge_owned(base_item, item)),
            None => merged.push(strip_template_metadata(item)),
        }
    }

    merged.extend(pool.into_iter().flatten().map(|(_, item)| item));
    merged
}

/// Drop bookkeeping keys from the top level of a record.
pub fn strip_template_metadata(item: Value) -> Value {
    match item {
        Value::Mapping(mut map) => {
            for key in TEMPLATE_METADATA_KEYS {
                map.remove(*key);
            }
            Value::Mapping(map)
        }
        other => other,
    }
}
