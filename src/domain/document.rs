//! Definition documents
//!
//! A [`Document`] is one named data-model definition: its declared parents
//! (`require`) and its body. Documents are never mutated once loaded; the
//! resolver builds new ones.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::ports::LoadError;
use crate::domain::value::{Mapping, Scalar, Value};

/// Top-level key naming the definition.
pub const NAME_KEY: &str = "name";

/// Inheritance directive key.
pub const REQUIRE_KEY: &str = "require";

/// Bookkeeping keys that never survive into merged output.
pub const TEMPLATE_METADATA_KEYS: &[&str] = &[REQUIRE_KEY, "_file_path", "_source_path"];

/// Name of a definition, keeping track of whether it had to be invented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionName {
    Declared(String),
    Placeholder(String),
}

impl DefinitionName {
    pub fn placeholder_for(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("definition");
        DefinitionName::Placeholder(format!("<unnamed: {}>", stem))
    }

    pub fn as_str(&self) -> &str {
        match self {
            DefinitionName::Declared(name) | DefinitionName::Placeholder(name) => name,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, DefinitionName::Placeholder(_))
    }
}

impl fmt::Display for DefinitionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `require` entry, e.g. `irradiance/direct/normal`.
///
/// Resolved against the source root, never against the requiring file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequireRef(String);

impl RequireRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File path for this reference under `root`, adding `.<extension>` unless
    /// the reference already carries it.
    pub fn to_path(&self, root: &Path, extension: &str) -> PathBuf {
        let suffix = format!(".{}", extension);
        if self.0.ends_with(&suffix) {
            root.join(&self.0)
        } else {
            root.join(format!("{}{}", self.0, suffix))
        }
    }

    /// Reference form of a file below `root` (relative, `/`-separated, no extension).
    pub fn from_path(root: &Path, path: &Path) -> Self {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let without_extension = relative.with_extension("");
        let reference = without_extension
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        Self(reference)
    }

    /// Directory part of the reference (`irradiance` for `irradiance/direct`).
    pub fn category(&self) -> Option<&str> {
        self.0.rsplit_once('/').map(|(dir, _)| {
            dir.rsplit_once('/')
                .map(|(_, last)| last)
                .unwrap_or(dir)
        })
    }
}

impl fmt::Display for RequireRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    name: DefinitionName,
    requires: Vec<RequireRef>,
    body: Mapping,
}

impl Document {
    pub fn new(
        path: PathBuf,
        name: DefinitionName,
        requires: Vec<RequireRef>,
        body: Mapping,
    ) -> Self {
        Self {
            path,
            name,
            requires,
            body,
        }
    }

    /// Build a document from a parsed value.
    ///
    /// The top level must be a mapping. `require` is lifted out of the body;
    /// a missing or non-scalar `name` yields a placeholder name.
    pub fn from_value(path: &Path, value: Value) -> Result<Self, LoadError> {
        let Value::Mapping(mut body) = value else {
            return Err(LoadError::NotAMapping {
                path: path.to_path_buf(),
                found: value.kind(),
            });
        };

        let requires = match body.remove(REQUIRE_KEY) {
            Some(value) => parse_requires(&value).map_err(|message| LoadError::InvalidRequire {
                path: path.to_path_buf(),
                message,
            })?,
            None => Vec::new(),
        };

        let name = match body.get(NAME_KEY) {
            Some(Value::Scalar(scalar)) if !matches!(scalar, Scalar::Null) => {
                DefinitionName::Declared(scalar.to_string())
            }
            _ => {
                body.remove(NAME_KEY);
                DefinitionName::placeholder_for(path)
            }
        };

        Ok(Self::new(path.to_path_buf(), name, requires, body))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &DefinitionName {
        &self.name
    }

    pub fn requires(&self) -> &[RequireRef] {
        &self.requires
    }

    pub fn body(&self) -> &Mapping {
        &self.body
    }

    pub fn into_body(self) -> Mapping {
        self.body
    }

    /// Look up a top-level string attribute such as `label` or `color`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.body.get(key).and_then(Value::as_str)
    }
}

/// Parse a `require` value: absent/null, a single reference, or an ordered list.
pub fn parse_requires(value: &Value) -> Result<Vec<RequireRef>, String> {
    let one = |item: &Value| -> Result<RequireRef, String> {
        match item.as_str().map(str::trim) {
            Some(reference) if !reference.is_empty() => Ok(RequireRef::new(reference)),
            Some(_) => Err("empty require reference".to_string()),
            None => Err(format!("require entries must be strings, found {}", item.kind())),
        }
    };

    match value {
        Value::Scalar(Scalar::Null) => Ok(Vec::new()),
        Value::Scalar(_) => Ok(vec![one(value)?]),
        Value::Sequence(items) => items.iter().map(one).collect(),
        Value::Mapping(_) => Err("require must be a reference or a list of references".to_string()),
    }
}
