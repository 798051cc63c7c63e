#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Path;

use definition_factory::infrastructure::source::parse_document;
use definition_factory::{merge, Value};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let Ok(document) = parse_document(Path::new("fuzz.yaml"), content) else {
            return;
        };
        let body = Value::Mapping(document.body().clone());
        assert_eq!(merge(&body, &body), body);
    }
});
