//! In-memory DocumentSource
//!
//! Holds YAML text by path and counts loads per path. Parsing follows the
//! same rules as the file-system source.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::document::Document;
use crate::domain::ports::document_source::normalize_lexically;
use crate::domain::ports::{DocumentSource, LoadError};
use crate::domain::services::resolver::DEFAULT_EXTENSION;

use super::yaml::parse_document;

#[derive(Debug)]
pub struct InMemoryDocumentSource {
    documents: HashMap<PathBuf, String>,
    extension: String,
    loads: Mutex<HashMap<PathBuf, usize>>,
}

impl InMemoryDocumentSource {
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
            extension: DEFAULT_EXTENSION.to_string(),
            loads: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_document(mut self, path: impl AsRef<Path>, yaml: impl Into<String>) -> Self {
        self.insert(path, yaml);
        self
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, yaml: impl Into<String>) {
        self.documents
            .insert(normalize_lexically(path.as_ref()), yaml.into());
    }

    /// How many times `path` has been loaded.
    pub fn load_count(&self, path: impl AsRef<Path>) -> usize {
        let key = normalize_lexically(path.as_ref());
        self.loads
            .lock()
            .map(|loads| loads.get(&key).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn total_loads(&self) -> usize {
        self.loads
            .lock()
            .map(|loads| loads.values().sum())
            .unwrap_or(0)
    }
}

impl Default for InMemoryDocumentSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSource for InMemoryDocumentSource {
    fn load(&self, path: &Path) -> Result<Document, LoadError> {
        let key = normalize_lexically(path);
        if let Ok(mut loads) = self.loads.lock() {
            *loads.entry(key.clone()).or_insert(0) += 1;
        }
        let text = self
            .documents
            .get(&key)
            .ok_or_else(|| LoadError::NotFound { path: key.clone() })?;
        parse_document(&key, text)
    }

    fn exists(&self, path: &Path) -> bool {
        self.documents.contains_key(&normalize_lexically(path))
    }

    fn discover(&self, root: &Path) -> Result<Vec<PathBuf>, LoadError> {
        let root = normalize_lexically(root);
        if self.documents.contains_key(&root) {
            return Ok(vec![root]);
        }

        let mut found: Vec<PathBuf> = self
            .documents
            .keys()
            .filter(|path| path.starts_with(&root))
            .filter(|path| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e == self.extension)
            })
            .cloned()
            .collect();
        if found.is_empty() {
            return Err(LoadError::NotFound { path: root });
        }
        found.sort();
        Ok(found)
    }
}
