//! Inspect use cases
//!
//! Read-only views of a single definition file or of a generated module.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::document::REQUIRE_KEY;
use crate::domain::ports::DocumentSource;
use crate::domain::services::RequirementResolver;
use crate::domain::value::{Mapping, Value};
use crate::domain::value_objects::ResolutionWarning;
use crate::error::{FactoryError, FactoryResult};
use crate::infrastructure::codegen::{resolve_format, DefinitionsModule, OutputFormat};

/// A definition file as written, or fully resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectedDefinition {
    pub path: PathBuf,
    pub name: String,
    pub body: Mapping,
    pub warnings: Vec<ResolutionWarning>,
}

/// Show one definition file.
///
/// With `resolve_root` the file is resolved against that source root;
/// otherwise its own content is returned, `require` included.
pub fn inspect_definition<S: DocumentSource>(
    source: S,
    path: &Path,
    resolve_root: Option<(&Path, &str)>,
) -> FactoryResult<InspectedDefinition> {
    match resolve_root {
        Some((root, extension)) => {
            let mut resolver = RequirementResolver::new(source, root).with_extension(extension);
            let document = resolver.resolve_path(path)?;
            Ok(InspectedDefinition {
                path: document.path().to_path_buf(),
                name: document.name().as_str().to_string(),
                warnings: resolver.take_warnings(),
                body: document.into_body(),
            })
        }
        None => {
            let document = source.load(path)?;
            let name = document.name().as_str().to_string();
            let mut requires: Vec<Value> = document
                .requires()
                .iter()
                .map(|reference| Value::string(reference.as_str()))
                .collect();
            let path = document.path().to_path_buf();
            let mut body = document.into_body();
            let require = match requires.len() {
                0 => None,
                1 => requires.pop(),
                _ => Some(Value::Sequence(requires)),
            };
            if let Some(require) = require {
                body.insert(REQUIRE_KEY.to_string(), require);
            }
            Ok(InspectedDefinition {
                path,
                name,
                body,
                warnings: Vec::new(),
            })
        }
    }
}

/// What `inspect python-dictionary` found.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModuleInspection {
    /// No definition requested: the names in the module.
    Names { names: Vec<String> },
    Definition { name: String, body: Value },
    Attribute {
        definition: String,
        attribute: String,
        value: Value,
    },
}

/// Look into a generated definitions module.
///
/// `attribute` may be a dotted path such as `sections.output`.
pub fn inspect_module(
    path: &Path,
    format: Option<OutputFormat>,
    definition: Option<&str>,
    attribute: Option<&str>,
) -> FactoryResult<ModuleInspection> {
    let format = resolve_format(format, path)?;
    let module = DefinitionsModule::read(path, format)?;

    let Some(name) = definition else {
        return Ok(ModuleInspection::Names {
            names: module.names().map(str::to_string).collect(),
        });
    };

    let body = module
        .get(name)
        .cloned()
        .map(Value::Mapping)
        .ok_or_else(|| FactoryError::DefinitionNotFound {
            name: name.to_string(),
            file: path.to_path_buf(),
        })?;

    match attribute {
        None => Ok(ModuleInspection::Definition {
            name: name.to_string(),
            body,
        }),
        Some(attribute) => {
            let value = body
                .get_path(attribute)
                .cloned()
                .ok_or_else(|| FactoryError::AttributeNotFound {
                    definition: name.to_string(),
                    attribute: attribute.to_string(),
                })?;
            Ok(ModuleInspection::Attribute {
                definition: name.to_string(),
                attribute: attribute.to_string(),
                value,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::source::InMemoryDocumentSource;
    use tempfile::tempdir;

    fn source() -> InMemoryDocumentSource {
        InMemoryDocumentSource::new()
            .with_document("defs/base.yaml", "name: Base\nunit: W\n")
            .with_document("defs/leaf.yaml", "name: Leaf\nrequire: base\nlabel: L\n")
    }

    #[test]
    fn raw_definition_keeps_its_require() {
        let inspected = inspect_definition(&source(), Path::new("defs/leaf.yaml"), None).unwrap();

        assert_eq!(inspected.name, "Leaf");
        assert_eq!(inspected.body.get(REQUIRE_KEY), Some(&Value::string("base")));
        assert!(inspected.body.get("unit").is_none());
    }

    #[test]
    fn resolved_definition_inherits() {
        let inspected = inspect_definition(
            &source(),
            Path::new("defs/leaf.yaml"),
            Some((Path::new("defs"), "yaml")),
        )
        .unwrap();

        assert_eq!(inspected.body.get("unit"), Some(&Value::string("W")));
        assert!(inspected.body.get(REQUIRE_KEY).is_none());
    }

    fn module_file(dir: &Path) -> PathBuf {
        let path = dir.join("definitions.json");
        std::fs::write(
            &path,
            r#"{"Leaf": {"name": "Leaf", "sections": {"output": {"unit": "W"}}}, "Base": {"name": "Base"}}"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn lists_names_without_a_definition() {
        let dir = tempdir().unwrap();
        let path = module_file(dir.path());

        let found = inspect_module(&path, None, None, None).unwrap();

        assert_eq!(
            found,
            ModuleInspection::Names {
                names: vec!["Base".to_string(), "Leaf".to_string()]
            }
        );
    }

    #[test]
    fn dotted_attribute_lookup() {
        let dir = tempdir().unwrap();
        let path = module_file(dir.path());

        let found =
            inspect_module(&path, None, Some("Leaf"), Some("sections.output.unit")).unwrap();

        assert_eq!(
            found,
            ModuleInspection::Attribute {
                definition: "Leaf".to_string(),
                attribute: "sections.output.unit".to_string(),
                value: Value::string("W"),
            }
        );
    }

    #[test]
    fn missing_attribute_is_an_error() {
        let dir = tempdir().unwrap();
        let path = module_file(dir.path());

        let err = inspect_module(&path, None, Some("Leaf"), Some("symbol")).unwrap_err();

        assert!(matches!(err, FactoryError::AttributeNotFound { .. }));
    }

    #[test]
    fn missing_definition_is_an_error() {
        let dir = tempdir().unwrap();
        let path = module_file(dir.path());

        let err = inspect_module(&path, None, Some("Nope"), None).unwrap_err();

        assert!(matches!(err, FactoryError::DefinitionNotFound { .. }));
    }
}
