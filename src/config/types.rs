//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::services::resolver::DEFAULT_EXTENSION;
use crate::infrastructure::codegen::{OutputFormat, DEFAULT_PYTHON_VARIABLE};

use super::loader::{self, ConfigError, ConfigWarning};

/// Where definitions live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source root that `require` references resolve against
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Extension of definition files, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: None,
            extension: default_extension(),
        }
    }
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

/// Defaults for `generate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateConfig {
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Output format; inferred from the output extension when unset
    #[serde(default)]
    pub format: Option<OutputFormat>,

    /// Variable the Python module assigns
    #[serde(default = "default_variable")]
    pub variable: String,

    /// Definitions to generate; every discovered definition when empty
    #[serde(default)]
    pub definitions: Vec<PathBuf>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            output: None,
            format: None,
            variable: default_variable(),
            definitions: Vec::new(),
        }
    }
}

fn default_variable() -> String {
    DEFAULT_PYTHON_VARIABLE.to_string()
}

/// Log configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive, e.g. `warn` or `definition_factory=debug`
    #[serde(default)]
    pub level: Option<String>,

    /// Write logs to this file instead of stderr
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub generate: GenerateConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        loader::load_with_warnings(path)
    }

    /// Apply environment variable overrides (DEFACTORY_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }
}
