//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (documents, services, ports)
//! - Does NOT contain resolution rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `GenerateUseCase` - Resolve models and write them as one module
//! - `inspect` - Show a definition file or look into a generated module
//! - `visualise` - Render the require graph
//! - `analyse` - Run graph analytics

use std::path::{Path, PathBuf};

use crate::domain::ports::document_source::normalize_lexically;

pub mod analyse;
pub mod generate;
pub mod inspect;
pub mod visualise;

pub use analyse::{analyse, load_graph, AnalysisKind, AnalysisReport};
pub use generate::{GenerateOptions, GenerateResult, GenerateUseCase};
pub use inspect::{inspect_definition, inspect_module, InspectedDefinition, ModuleInspection};
pub use visualise::{render_graph, GraphView};

/// Source root for a target given on the command line.
///
/// The configured root wins when the target lies inside it; otherwise a
/// directory target is its own root and a file target uses its parent.
pub fn source_root_for(target: &Path, configured: Option<&Path>) -> PathBuf {
    if let Some(root) = configured {
        if normalize_lexically(target).starts_with(normalize_lexically(root)) {
            return root.to_path_buf();
        }
    }
    if target.is_dir() {
        return target.to_path_buf();
    }
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
