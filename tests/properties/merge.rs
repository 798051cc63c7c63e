use definition_factory::{merge, merge_structure, Value};
use proptest::prelude::*;

use crate::strategies::{dedup, record, scalar, value};

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn merging_a_value_with_itself_changes_nothing(x in value()) {
        prop_assert_eq!(merge(&x, &x), x);
    }

    #[test]
    fn null_override_keeps_the_base(x in value()) {
        prop_assert_eq!(merge(&x, &Value::null()), x);
    }

    #[test]
    fn null_under_a_shared_key_replaces_the_base(key in "[a-e]", base in value()) {
        let base = Value::Mapping([(key.clone(), base)].into_iter().collect());
        let overlay = Value::Mapping([(key.clone(), Value::null())].into_iter().collect());
        prop_assert_eq!(merge(&base, &overlay), overlay);
    }

    #[test]
    fn non_null_scalar_override_wins(base in value(), overlay in scalar()) {
        prop_assume!(!overlay.is_null());
        prop_assert_eq!(merge(&base, &overlay), overlay);
    }

    #[test]
    fn merge_leaves_its_inputs_alone(base in value(), overlay in value()) {
        let (base_before, overlay_before) = (base.clone(), overlay.clone());
        let _ = merge(&base, &overlay);
        prop_assert_eq!(base, base_before);
        prop_assert_eq!(overlay, overlay_before);
    }

    #[test]
    fn structure_keeps_override_order_then_untouched_base(
        base_keys in prop::collection::vec("[a-h]", 0..6),
        overlay_keys in prop::collection::vec("[a-h]", 1..6),
    ) {
        let base_keys = dedup(base_keys);
        let overlay_keys = dedup(overlay_keys);
        let base: Vec<Value> = base_keys.iter().map(|k| record(k, 1)).collect();
        let overlay: Vec<Value> = overlay_keys.iter().map(|k| record(k, 2)).collect();

        let merged = merge_structure(base, overlay);

        let mut expected: Vec<(String, i64)> =
            overlay_keys.iter().map(|k| (k.clone(), 2)).collect();
        expected.extend(
            base_keys
                .iter()
                .filter(|k| !overlay_keys.contains(k))
                .map(|k| (k.clone(), 1)),
        );
        let actual: Vec<(String, i64)> = merged
            .iter()
            .map(|item| {
                let section = item.get("section").and_then(Value::as_str).unwrap_or_default();
                let value = match item.get("value") {
                    Some(v) if *v == Value::int(2) => 2,
                    _ => 1,
                };
                (section.to_string(), value)
            })
            .collect();
        prop_assert_eq!(actual, expected);
    }
}
