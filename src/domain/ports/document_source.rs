//! DocumentSource port
//!
//! Loads definition documents by path and discovers the documents below a
//! source root.

use std::path::{Component, Path, PathBuf};

use crate::domain::document::Document;
use crate::domain::value_objects::CanonicalPath;

pub trait DocumentSource: Send + Sync {
    /// Load and parse one document.
    fn load(&self, path: &Path) -> Result<Document, LoadError>;

    fn exists(&self, path: &Path) -> bool;

    /// All documents below `root` (or `root` itself when it is a document), sorted.
    fn discover(&self, root: &Path) -> Result<Vec<PathBuf>, LoadError>;

    /// Key under which `path` is cached and tracked for cycles.
    ///
    /// The default folds `.` and `..` lexically; sources backed by a real
    /// filesystem also resolve symlinks.
    fn canonicalize(&self, path: &Path) -> CanonicalPath {
        CanonicalPath::new(normalize_lexically(path))
    }
}

impl<T: DocumentSource + ?Sized> DocumentSource for &T {
    fn load(&self, path: &Path) -> Result<Document, LoadError> {
        (**self).load(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn discover(&self, root: &Path) -> Result<Vec<PathBuf>, LoadError> {
        (**self).discover(root)
    }

    fn canonicalize(&self, path: &Path) -> CanonicalPath {
        (**self).canonicalize(path)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("definition not found: {path}")]
    NotFound { path: PathBuf },

    #[error("invalid YAML in {path}{}: {message}", location(*line, *column))]
    Parse {
        path: PathBuf,
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },

    #[error("definition {path} must be a mapping at the top level, found {found}")]
    NotAMapping { path: PathBuf, found: &'static str },

    #[error("invalid require directive in {path}: {message}\n  → Fix: use `require: a/b` or a list of such references")]
    InvalidRequire { path: PathBuf, message: String },

    #[error("failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::NotFound { path }
            | LoadError::Parse { path, .. }
            | LoadError::NotAMapping { path, .. }
            | LoadError::InvalidRequire { path, .. }
            | LoadError::Io { path, .. } => path,
        }
    }
}

fn location(line: Option<usize>, column: Option<usize>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(":{}:{}", line, column),
        (Some(line), None) => format!(":{}", line),
        _ => String::new(),
    }
}

pub(crate) fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
