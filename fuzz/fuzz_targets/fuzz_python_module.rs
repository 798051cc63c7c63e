#![no_main]

use libfuzzer_sys::fuzz_target;

use definition_factory::infrastructure::codegen::{parse_python_module, render_python_value};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Whatever the reader accepts must survive a write and a second read.
        if let Ok(value) = parse_python_module(content) {
            let module = format!("X = {}\n", render_python_value(&value));
            assert_eq!(parse_python_module(&module).ok(), Some(value));
        }
    }
});
