//! Merge engine
//!
//! Deep-merges an override value onto a base value:
//! - Null override of the whole value: the base is kept
//! - Mapping + Mapping: merged key by key, recursively; a null under a key
//!   both sides carry replaces the base value
//! - Sequence + Sequence: delegated to the structure-list merger
//! - Anything else: the override wins outright, no coercion

use crate::domain::value::{Mapping, Value};

use super::structure::merge_structure;

/// Merge `overlay` onto `base` without touching either input.
pub fn merge(base: &Value, overlay: &Value) -> Value {
    merge_owned(base.clone(), overlay.clone())
}

/// Owning form of [`merge`], used on the resolver's hot path.
pub fn merge_owned(base: Value, overlay: Value) -> Value {
    if overlay.is_null() {
        return base;
    }
    merge_entry(base, overlay)
}

/// Merge under a key present on both sides: the override wins unless both
/// sides are containers of the same kind.
fn merge_entry(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            Value::Mapping(merge_mappings(base, overlay))
        }
        (Value::Sequence(base), Value::Sequence(overlay)) => {
            Value::Sequence(merge_structure(base, overlay))
        }
        (_, overlay) => overlay,
    }
}

/// Merge two mappings; keys present on one side only are copied as-is.
pub fn merge_mappings(mut base: Mapping, overlay: Mapping) -> Mapping {
    for (key, overlay_value) in overlay {
        let merged = match base.remove(&key) {
            Some(base_value) => merge_entry(base_value, overlay_value),
            None => overlay_value,
        };
        base.insert(key, merged);
    }
    base
}

/// Fold a series of layers, lowest precedence first.
pub fn merge_all<I>(layers: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    layers.into_iter().fold(Value::null(), merge_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        Value::from(serde_yaml_ng::from_str::<serde_yaml_ng::Value>(text).unwrap())
    }

    #[test]
    fn scalar_override_wins() {
        assert_eq!(merge(&Value::int(1), &Value::int(2)), Value::int(2));
        assert_eq!(merge(&Value::int(2), &Value::int(1)), Value::int(1));
    }

    #[test]
    fn null_override_keeps_base() {
        let base = yaml("a: 1\nb: [x]\n");
        assert_eq!(merge(&base, &Value::null()), base);
    }

    #[test]
    fn null_under_a_shared_key_clears_the_base() {
        let merged = merge(&yaml("color: red\nlabel: L\n"), &yaml("color: ~\n"));
        assert!(merged.get("color").unwrap().is_null());
        assert_eq!(merged.get("label"), Some(&Value::string("L")));

        let nested = merge(&yaml("a: {b: 1, c: 2}\n"), &yaml("a: {b: ~}\n"));
        assert_eq!(nested, yaml("a: {b: ~, c: 2}\n"));
    }

    #[test]
    fn null_key_only_in_override_is_copied() {
        let merged = merge(&yaml("a: 1\n"), &yaml("b: ~\n"));
        assert!(merged.get("b").unwrap().is_null());
        assert_eq!(merged.get("a"), Some(&Value::int(1)));
    }

    #[test]
    fn mappings_merge_deeply() {
        let base = yaml(
            r#"
sections:
  input:
    unit: W
    precision: 2
"#,
        );
        let overlay = yaml(
            r#"
sections:
  input:
    unit: kW
  output:
    title: Out
"#,
        );

        let merged = merge(&base, &overlay);

        assert_eq!(
            merged,
            yaml(
                r#"
sections:
  input:
    unit: kW
    precision: 2
  output:
    title: Out
"#
            )
        );
    }

    #[test]
    fn type_mismatch_override_wins() {
        let merged = merge(&yaml("a: {b: 1}\n"), &yaml("a: [1, 2]\n"));
        assert_eq!(merged, yaml("a: [1, 2]\n"));

        let merged = merge(&yaml("a: [1]\n"), &yaml("a: text\n"));
        assert_eq!(merged, yaml("a: text\n"));
    }

    #[test]
    fn nested_sequences_use_structure_merge() {
        let base = yaml(
            r#"
sections:
  output:
    structure:
      - section: x
        v: 1
"#,
        );
        let overlay = yaml(
            r#"
sections:
  output:
    structure:
      - section: y
        v: 2
"#,
        );

        let merged = merge(&base, &overlay);
        let structure = merged.get_path("sections.output.structure").unwrap();
        assert_eq!(structure, &yaml("[{section: y, v: 2}, {section: x, v: 1}]"));
    }

    #[test]
    fn inputs_are_untouched() {
        let base = yaml("a: {b: 1}\n");
        let overlay = yaml("a: {c: 2}\n");
        let base_before = base.clone();
        let overlay_before = overlay.clone();

        let _ = merge(&base, &overlay);

        assert_eq!(base, base_before);
        assert_eq!(overlay, overlay_before);
    }

    #[test]
    fn merge_all_applies_layers_in_order() {
        let merged = merge_all(vec![yaml("k: 1\na: 1\n"), yaml("k: 2\n"), yaml("k: 3\nb: 3\n")]);
        assert_eq!(merged, yaml("k: 3\na: 1\nb: 3\n"));
    }
}
