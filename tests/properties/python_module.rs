use definition_factory::infrastructure::codegen::{parse_python_module, render_python_value};
use definition_factory::Value;
use proptest::prelude::*;

use crate::strategies::value;

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn reader_never_panics(text in any::<String>()) {
        let _ = parse_python_module(&text);
    }

    #[test]
    fn emitted_literals_read_back(x in value(), label in any::<String>()) {
        let module = format!("X = {}\n", render_python_value(&x));
        prop_assert_eq!(parse_python_module(&module).unwrap(), x);

        let module = format!("X = {}\n", render_python_value(&Value::string(label.clone())));
        prop_assert_eq!(parse_python_module(&module).unwrap(), Value::string(label));
    }
}
