//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `source/` - Document sources (YAML files, in-memory) and discovery
//! - `codegen/` - Definitions module emitters and readers
//! - `fs` - Atomic writes

pub mod codegen;
pub mod fs;
pub mod source;

// Re-export for convenience
pub use codegen::{CodegenError, DefinitionsModule, OutputFormat};
pub use source::{InMemoryDocumentSource, YamlDocumentSource};
