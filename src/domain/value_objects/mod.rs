//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod canonical_path;
mod config_warning;
mod resolution_warning;

pub use canonical_path::CanonicalPath;
pub use config_warning::ConfigWarning;
pub use resolution_warning::ResolutionWarning;
