//! JSON and YAML emitters

use std::path::Path;

use crate::domain::value::Value;

use super::{CodegenError, DefinitionsModule, OutputFormat};

pub(super) fn render_json(module: &DefinitionsModule) -> Result<String, CodegenError> {
    let mut text = serde_json::to_string_pretty(module).map_err(|e| CodegenError::Render {
        format: OutputFormat::Json,
        message: e.to_string(),
    })?;
    text.push('\n');
    Ok(text)
}

pub(super) fn render_yaml(module: &DefinitionsModule) -> Result<String, CodegenError> {
    serde_yaml_ng::to_string(module).map_err(|e| CodegenError::Render {
        format: OutputFormat::Yaml,
        message: e.to_string(),
    })
}

pub(super) fn parse_json(path: &Path, text: &str) -> Result<Value, CodegenError> {
    serde_json::from_str::<serde_json::Value>(text)
        .map(Value::from)
        .map_err(|e| CodegenError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

pub(super) fn parse_yaml(path: &Path, text: &str) -> Result<Value, CodegenError> {
    serde_yaml_ng::from_str::<serde_yaml_ng::Value>(text)
        .map(Value::from)
        .map_err(|e| CodegenError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}
