//! Python module emitter and reader
//!
//! The emitter writes one assignment of a dict literal. The reader accepts
//! the literal subset the emitter produces (plus single-quoted strings,
//! tuples and comments), which is enough to read generated modules back.

use std::fmt::Write as _;

use serde_json::Number;

use crate::domain::value::{Scalar, Value};

use super::DefinitionsModule;

const INDENT: &str = "    ";

pub fn render_python_module(module: &DefinitionsModule, variable: &str) -> String {
    let mut out = String::new();
    out.push_str("# Generated by defactory from data-model definitions. Do not edit.\n\n");
    let _ = write!(out, "{} = ", variable);

    if module.is_empty() {
        out.push_str("{}\n");
        return out;
    }

    out.push_str("{\n");
    for (name, body) in module.iter() {
        out.push_str(INDENT);
        push_string(&mut out, name);
        out.push_str(": ");
        push_mapping(&mut out, body.iter(), 1);
        out.push_str(",\n");
    }
    out.push_str("}\n");
    out
}

/// A value as a Python literal, laid out over several lines.
pub fn render_python_value(value: &Value) -> String {
    let mut out = String::new();
    push_value(&mut out, value, 0);
    out
}

fn push_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Scalar(scalar) => push_scalar(out, scalar),
        Value::Mapping(map) => push_mapping(out, map.iter(), depth),
        Value::Sequence(items) => {
            if items.is_empty() {
                out.push_str("[]");
                return;
            }
            out.push_str("[\n");
            for item in items {
                push_indent(out, depth + 1);
                push_value(out, item, depth + 1);
                out.push_str(",\n");
            }
            push_indent(out, depth);
            out.push(']');
        }
    }
}

fn push_mapping<'a>(
    out: &mut String,
    entries: impl ExactSizeIterator<Item = (&'a String, &'a Value)>,
    depth: usize,
) {
    if entries.len() == 0 {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    for (key, value) in entries {
        push_indent(out, depth + 1);
        push_string(out, key);
        out.push_str(": ");
        push_value(out, value, depth + 1);
        out.push_str(",\n");
    }
    push_indent(out, depth);
    out.push('}');
}

fn push_scalar(out: &mut String, scalar: &Scalar) {
    match scalar {
        Scalar::Null => out.push_str("None"),
        Scalar::Bool(true) => out.push_str("True"),
        Scalar::Bool(false) => out.push_str("False"),
        Scalar::Number(n) => {
            let _ = write!(out, "{}", n);
        }
        Scalar::String(s) => push_string(out, s),
    }
}

fn push_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// Read the value assigned by a generated module.
///
/// The first top-level assignment is used.
pub fn parse_python_module(text: &str) -> Result<Value, String> {
    let mut parser = Parser::new(text);
    parser.skip_trivia();
    parser.identifier()?;
    parser.skip_trivia();
    parser.expect('=')?;
    let value = parser.value()?;
    parser.skip_trivia();
    if let Some(c) = parser.peek() {
        return Err(parser.error(&format!("unexpected '{}' after the definitions", c)));
    }
    Ok(value)
}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    text: &'a str,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.char_indices().peekable(),
            text,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn error(&mut self, message: &str) -> String {
        let offset = self.chars.peek().map(|(i, _)| *i).unwrap_or(self.text.len());
        let line = self.text[..offset].matches('\n').count() + 1;
        format!("line {}: {}", line, message)
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '#' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), String> {
        self.skip_trivia();
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(&format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(&format!("expected '{}', found end of input", expected))),
        }
    }

    fn identifier(&mut self) -> Result<String, String> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if name.is_empty() {
            Err(self.error("expected an assignment"))
        } else {
            Ok(name)
        }
    }

    fn value(&mut self) -> Result<Value, String> {
        self.skip_trivia();
        match self.peek() {
            Some('{') => self.dict(),
            Some('[') => self.list('[', ']'),
            Some('(') => self.list('(', ')'),
            Some('"') | Some('\'') => self.string().map(Value::string),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_alphabetic() => match self.identifier()?.as_str() {
                "None" => Ok(Value::null()),
                "True" => Ok(Value::bool(true)),
                "False" => Ok(Value::bool(false)),
                other => Err(self.error(&format!("unsupported name '{}'", other))),
            },
            Some(c) => Err(self.error(&format!("unexpected '{}'", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn dict(&mut self) -> Result<Value, String> {
        self.expect('{')?;
        let mut map = crate::domain::value::Mapping::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Mapping(map));
            }
            let key = match self.value()? {
                Value::Scalar(scalar) => scalar.to_string(),
                other => return Err(self.error(&format!("unhashable {} key", other.kind()))),
            };
            self.expect(':')?;
            let value = self.value()?;
            map.insert(key, value);
            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
    }

    fn list(&mut self, open: char, close: char) -> Result<Value, String> {
        self.expect(open)?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(Value::Sequence(items));
            }
            items.push(self.value()?);
            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(c) if c == close => {}
                _ => return Err(self.error(&format!("expected ',' or '{}'", close))),
            }
        }
    }

    fn string(&mut self) -> Result<String, String> {
        let Some(quote) = self.bump() else {
            return Err(self.error("expected a string"));
        };
        let mut s = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(s),
                Some('\\') => s.push(self.escape()?),
                Some(c) => s.push(c),
            }
        }
    }

    fn escape(&mut self) -> Result<char, String> {
        match self.bump() {
            Some('n') => Ok('\n'),
            Some('r') => Ok('\r'),
            Some('t') => Ok('\t'),
            Some('0') => Ok('\0'),
            Some('\\') => Ok('\\'),
            Some('\'') => Ok('\''),
            Some('"') => Ok('"'),
            Some('x') => self.hex_escape(2),
            Some('u') => self.hex_escape(4),
            Some('U') => self.hex_escape(8),
            Some(c) => Err(self.error(&format!("unsupported escape '\\{}'", c))),
            None => Err(self.error("unterminated string")),
        }
    }

    fn hex_escape(&mut self, digits: usize) -> Result<char, String> {
        let mut code = 0u32;
        for _ in 0..digits {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("invalid hex escape"))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| self.error("invalid character escape"))
    }

    fn number(&mut self) -> Result<Value, String> {
        let mut literal = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.' | '_') {
                if c != '_' {
                    literal.push(c);
                }
                self.bump();
            } else {
                break;
            }
        }

        if let Ok(i) = literal.parse::<i64>() {
            return Ok(Value::int(i));
        }
        if let Ok(u) = literal.parse::<u64>() {
            return Ok(Value::Scalar(Scalar::Number(Number::from(u))));
        }
        literal
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(|n| Value::Scalar(Scalar::Number(n)))
            .ok_or_else(|| self.error(&format!("invalid number '{}'", literal)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn yaml(text: &str) -> Value {
        Value::from(serde_yaml_ng::from_str::<serde_yaml_ng::Value>(text).unwrap())
    }

    fn module() -> DefinitionsModule {
        let mut module = DefinitionsModule::new();
        let body = yaml(
            r#"
name: Leaf
label: "Say \"hi\""
empty: {}
sections:
  output:
    structure:
      - section: a
        value: 2
      - section: b
        value: 0.5
flags: [true, ~]
"#,
        );
        if let Value::Mapping(body) = body {
            module.insert("Leaf", body);
        }
        module
    }

    #[test]
    fn renders_module() {
        assert_snapshot!(render_python_module(&module(), "DEFINITIONS"), @r#"
        # Generated by defactory from data-model definitions. Do not edit.

        DEFINITIONS = {
            "Leaf": {
                "empty": {},
                "flags": [
                    True,
                    None,
                ],
                "label": "Say \"hi\"",
                "name": "Leaf",
                "sections": {
                    "output": {
                        "structure": [
                            {
                                "section": "a",
                                "value": 2,
                            },
                            {
                                "section": "b",
                                "value": 0.5,
                            },
                        ],
                    },
                },
            },
        }
        "#);
    }

    #[test]
    fn empty_module_is_an_empty_dict() {
        assert!(render_python_module(&DefinitionsModule::new(), "X").ends_with("X = {}\n"));
    }

    #[test]
    fn reads_back_what_it_writes() {
        let text = render_python_module(&module(), "DEFINITIONS");
        let value = parse_python_module(&text).unwrap();
        let expected = yaml(
            r#"
Leaf:
  name: Leaf
  label: "Say \"hi\""
  empty: {}
  sections:
    output:
      structure:
        - section: a
          value: 2
        - section: b
          value: 0.5
  flags: [true, ~]
"#,
        );
        assert_eq!(value, expected);
    }

    #[test]
    fn reads_hand_written_literals() {
        let value = parse_python_module(
            "# comment\nDEFS = {'a': (1, -2.5, 'x\\ty'), \"b\": {1: False}}  # trailing\n",
        )
        .unwrap();
        assert_eq!(value, yaml("a: [1, -2.5, \"x\\ty\"]\nb: {'1': false}\n"));
    }

    #[test]
    fn escapes_control_characters() {
        let rendered = render_python_value(&Value::string("a\u{1}b\\"));
        assert_eq!(rendered, r#""a\x01b\\""#);
        let module = format!("X = {}", rendered);
        assert_eq!(parse_python_module(&module).unwrap(), Value::string("a\u{1}b\\"));
    }

    #[test]
    fn reports_the_failing_line() {
        let err = parse_python_module("X = {\n  'a': oops,\n}\n").unwrap_err();
        assert!(err.starts_with("line 2"), "{err}");
    }
}
