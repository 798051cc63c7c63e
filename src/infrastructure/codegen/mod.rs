//! Codegen emitters
//!
//! A [`DefinitionsModule`] maps model names to resolved definition bodies and
//! is written as a Python module, JSON, or YAML. Every format reads back
//! into the same module.

mod python;
mod structured;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::document::Document;
use crate::domain::value::{Mapping, Value};
use crate::infrastructure::fs::write_atomic;

pub use python::{parse_python_module, render_python_module, render_python_value};

/// Variable the Python module assigns the definitions to.
pub const DEFAULT_PYTHON_VARIABLE: &str = "DATA_MODEL_DEFINITIONS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Python,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Format implied by a file extension (`.py`, `.json`, `.yaml`, `.yml`).
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "py" => Some(OutputFormat::Python),
            "json" => Some(OutputFormat::Json),
            "yaml" | "yml" => Some(OutputFormat::Yaml),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Python => "python",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "python" | "py" => Ok(OutputFormat::Python),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("cannot tell the output format of {path}\n  → Fix: use a .py, .json or .yaml file, or pass --format")]
    UnknownFormat { path: PathBuf },

    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("{path} is not a definitions module: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to render definitions as {format}: {message}")]
    Render {
        format: OutputFormat,
        message: String,
    },
}

/// Model name → resolved definition body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DefinitionsModule {
    definitions: BTreeMap<String, Mapping>,
}

impl DefinitionsModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents<I>(documents: I) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        let mut module = Self::new();
        for document in documents {
            module.insert_document(document);
        }
        module
    }

    pub fn insert(&mut self, name: impl Into<String>, body: Mapping) -> Option<Mapping> {
        self.definitions.insert(name.into(), body)
    }

    pub fn insert_document(&mut self, document: Document) -> Option<Mapping> {
        let name = document.name().as_str().to_string();
        self.insert(name, document.into_body())
    }

    /// Add every definition of `other`, replacing same-named ones.
    pub fn overlay(&mut self, other: DefinitionsModule) {
        self.definitions.extend(other.definitions);
    }

    pub fn get(&self, name: &str) -> Option<&Mapping> {
        self.definitions.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Mapping)> {
        self.definitions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Build a module from a parsed value: a mapping of mappings.
    pub fn from_value(path: &Path, value: Value) -> Result<Self, CodegenError> {
        let not_a_module = |message: String| CodegenError::Parse {
            path: path.to_path_buf(),
            message,
        };
        let Value::Mapping(entries) = value else {
            return Err(not_a_module(format!(
                "expected a mapping of definitions, found {}",
                value.kind()
            )));
        };

        let mut module = Self::new();
        for (name, body) in entries {
            match body {
                Value::Mapping(body) => {
                    module.insert(name, body);
                }
                other => {
                    return Err(not_a_module(format!(
                        "definition '{}' is a {}, expected a mapping",
                        name,
                        other.kind()
                    )))
                }
            }
        }
        Ok(module)
    }

    pub fn render(&self, format: OutputFormat, variable: &str) -> Result<String, CodegenError> {
        match format {
            OutputFormat::Python => Ok(render_python_module(self, variable)),
            OutputFormat::Json => structured::render_json(self),
            OutputFormat::Yaml => structured::render_yaml(self),
        }
    }

    pub fn parse(path: &Path, format: OutputFormat, text: &str) -> Result<Self, CodegenError> {
        let value = match format {
            OutputFormat::Python => parse_python_module(text).map_err(|message| {
                CodegenError::Parse {
                    path: path.to_path_buf(),
                    message,
                }
            })?,
            OutputFormat::Json => structured::parse_json(path, text)?,
            OutputFormat::Yaml => structured::parse_yaml(path, text)?,
        };
        Self::from_value(path, value)
    }

    pub fn read(path: &Path, format: OutputFormat) -> Result<Self, CodegenError> {
        let text = std::fs::read_to_string(path).map_err(|e| CodegenError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(path, format, &text)
    }

    /// Render and write atomically.
    pub fn write(
        &self,
        path: &Path,
        format: OutputFormat,
        variable: &str,
    ) -> Result<(), CodegenError> {
        let text = self.render(format, variable)?;
        write_atomic(path, text.as_bytes()).map_err(|e| CodegenError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::info!(
            path = %path.display(),
            format = %format,
            definitions = self.len(),
            "definitions written"
        );
        Ok(())
    }
}

/// Pick the output format: explicit choice first, then the file extension.
pub fn resolve_format(
    explicit: Option<OutputFormat>,
    path: &Path,
) -> Result<OutputFormat, CodegenError> {
    explicit
        .or_else(|| OutputFormat::from_path(path))
        .ok_or_else(|| CodegenError::UnknownFormat {
            path: path.to_path_buf(),
        })
}
