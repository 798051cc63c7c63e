//! YAML DocumentSource backed by the local file system

use std::path::{Path, PathBuf};

use crate::domain::document::Document;
use crate::domain::ports::document_source::normalize_lexically;
use crate::domain::ports::{DocumentSource, LoadError};
use crate::domain::services::resolver::DEFAULT_EXTENSION;
use crate::domain::value::Value;
use crate::domain::value_objects::CanonicalPath;

use super::discover::discover_documents;

#[derive(Debug, Clone)]
pub struct YamlDocumentSource {
    extension: String,
}

impl YamlDocumentSource {
    pub fn new() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

impl Default for YamlDocumentSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSource for YamlDocumentSource {
    fn load(&self, path: &Path) -> Result<Document, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound {
                path: path.to_path_buf(),
            },
            _ => LoadError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;
        parse_document(path, &text)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn discover(&self, root: &Path) -> Result<Vec<PathBuf>, LoadError> {
        discover_documents(root, &self.extension)
    }

    fn canonicalize(&self, path: &Path) -> CanonicalPath {
        let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| normalize_lexically(path));
        CanonicalPath::new(canonical)
    }
}

/// Parse YAML text into a document.
pub fn parse_document(path: &Path, text: &str) -> Result<Document, LoadError> {
    let parsed: serde_yaml_ng::Value =
        serde_yaml_ng::from_str(text).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
            message: e.to_string(),
        })?;
    Document::from_value(path, Value::from(parsed))
}
