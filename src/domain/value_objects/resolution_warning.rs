//! Recoverable conditions met while resolving definitions.

use std::fmt;

use super::CanonicalPath;

/// A condition that did not stop resolution but changed its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionWarning {
    /// The document has no usable `name`; `placeholder` was used instead.
    MissingName {
        path: CanonicalPath,
        placeholder: String,
    },
    /// `required_by` requires `path`, which is already being resolved on the
    /// same chain. Only that require edge was skipped.
    CircularRequire {
        path: CanonicalPath,
        required_by: CanonicalPath,
    },
}

impl ResolutionWarning {
    /// Stable identifier used in NDJSON events.
    pub fn code(&self) -> &'static str {
        match self {
            ResolutionWarning::MissingName { .. } => "missing_name",
            ResolutionWarning::CircularRequire { .. } => "circular_require",
        }
    }

    pub fn path(&self) -> &CanonicalPath {
        match self {
            ResolutionWarning::MissingName { path, .. }
            | ResolutionWarning::CircularRequire { path, .. } => path,
        }
    }
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionWarning::MissingName { path, placeholder } => {
                write!(f, "{} has no name, using '{}'", path, placeholder)
            }
            ResolutionWarning::CircularRequire { path, required_by } => write!(
                f,
                "circular require: {} requires {}, which is already being resolved; skipped",
                required_by, path
            ),
        }
    }
}
