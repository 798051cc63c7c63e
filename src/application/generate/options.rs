//! Generate Options

use std::path::PathBuf;

use crate::domain::services::resolver::DEFAULT_EXTENSION;
use crate::infrastructure::codegen::{OutputFormat, DEFAULT_PYTHON_VARIABLE};

/// Options for the generate use case
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Source root that `require` references resolve against
    pub source_path: PathBuf,
    /// Models to generate; every discovered definition when empty
    pub definitions: Vec<PathBuf>,
    /// Module to write
    pub output: PathBuf,
    /// Explicit format; inferred from `output` when `None`
    pub format: Option<OutputFormat>,
    /// Variable the Python module assigns
    pub variable: String,
    /// Definition file extension
    pub extension: String,
    /// Rebuild the output instead of overlaying the existing definitions
    pub reset: bool,
}

impl GenerateOptions {
    pub fn new(source_path: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            definitions: Vec::new(),
            output: output.into(),
            format: None,
            variable: DEFAULT_PYTHON_VARIABLE.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            reset: false,
        }
    }

    pub fn with_definitions(mut self, definitions: Vec<PathBuf>) -> Self {
        self.definitions = definitions;
        self
    }

    pub fn with_format(mut self, format: Option<OutputFormat>) -> Self {
        self.format = format;
        self
    }

    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = variable.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }
}
