//! Definition discovery
//!
//! Walks a source root for definition files. A `.definitionignore` file in
//! any directory excludes paths with gitignore syntax.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::domain::ports::LoadError;

/// Per-directory ignore file honoured during discovery.
pub const IGNORE_FILE_NAME: &str = ".definitionignore";

/// Definition files under `root`, sorted.
///
/// A file root is returned as-is.
pub fn discover_documents(root: &Path, extension: &str) -> Result<Vec<PathBuf>, LoadError> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        return Err(LoadError::NotFound {
            path: root.to_path_buf(),
        });
    }

    let walker = WalkBuilder::new(root)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .add_custom_ignore_filename(IGNORE_FILE_NAME)
        .sort_by_file_path(|a, b| a.cmp(b))
        .build();

    let mut found = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| LoadError::Io {
            path: root.to_path_buf(),
            message: e.to_string(),
        })?;
        let is_file = entry.file_type().is_some_and(|t| t.is_file());
        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == extension);
        if is_file && matches {
            found.push(entry.into_path());
        }
    }
    found.sort();

    tracing::debug!(root = %root.display(), count = found.len(), "discovered definitions");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "name: X\n").unwrap();
    }

    #[test]
    fn finds_nested_definitions_sorted() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "b.yaml");
        touch(dir.path(), "a/z.yaml");
        touch(dir.path(), "a/y.yaml");
        touch(dir.path(), "notes.txt");

        let found = discover_documents(dir.path(), "yaml").unwrap();

        let relative: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("a/y.yaml"),
                PathBuf::from("a/z.yaml"),
                PathBuf::from("b.yaml"),
            ]
        );
    }

    #[test]
    fn honours_definitionignore() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "keep.yaml");
        touch(dir.path(), "drafts/skip.yaml");
        std::fs::write(dir.path().join(IGNORE_FILE_NAME), "drafts/\n").unwrap();

        let found = discover_documents(dir.path(), "yaml").unwrap();

        assert_eq!(found, vec![dir.path().join("keep.yaml")]);
    }

    #[test]
    fn single_file_root() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "only.yaml");
        let root = dir.path().join("only.yaml");

        assert_eq!(discover_documents(&root, "yaml").unwrap(), vec![root]);
    }

    #[test]
    fn missing_root_is_not_found() {
        let dir = tempdir().unwrap();
        let err = discover_documents(&dir.path().join("nope"), "yaml").unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }
}
