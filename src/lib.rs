//! Definition Factory - resolves inheriting data-model definitions
//!
//! Definitions are YAML documents that `require` other definitions and
//! override what they inherit. The factory resolves every `require` chain
//! into one self-contained definition per model, emits the result as a
//! Python, JSON or YAML module, and exposes the require graph for
//! inspection and analysis.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

// Re-exports for convenience
pub use config::Config;
pub use domain::document::{DefinitionName, Document, RequireRef};
pub use domain::services::{merge, merge_structure, DependencyGraph, RequirementResolver};
pub use domain::value::{Mapping, Scalar, Value};
pub use error::{FactoryError, FactoryResult};
pub use infrastructure::{DefinitionsModule, OutputFormat, YamlDocumentSource};
