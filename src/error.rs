//! Error types for the definition factory
//!
//! Each layer owns a `thiserror` enum; [`FactoryError`] gathers them for
//! callers that drive several layers at once.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::ports::LoadError;
use crate::domain::services::{GraphError, ResolveError};
use crate::infrastructure::CodegenError;

/// Result type alias for factory operations
pub type FactoryResult<T> = Result<T, FactoryError>;

/// Main error type for factory operations
#[derive(Error, Debug)]
pub enum FactoryError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Lookup of a model that the module does not contain
    #[error("definition '{name}' not found in {file}")]
    DefinitionNotFound { name: String, file: PathBuf },

    /// Inspection of an attribute that the model does not carry
    #[error("attribute '{attribute}' not found in definition '{definition}'")]
    AttributeNotFound {
        definition: String,
        attribute: String,
    },

    /// Some models of a batch failed; the rest were written
    #[error("{failed} of {total} definitions failed to resolve")]
    PartialFailure { failed: usize, total: usize },
}
