//! Inspect command handler

use anyhow::Result;
use serde_json::json;

use definition_factory::application::{inspect_definition, inspect_module, source_root_for};
use definition_factory::presentation::output;
use definition_factory::presentation::InspectCommand;
use definition_factory::Value;

use super::Session;

pub fn cmd_inspect(session: &Session, command: InspectCommand) -> Result<()> {
    match command {
        InspectCommand::YamlFile {
            path,
            resolve,
            source_path,
        } => {
            let root = resolve.then(|| {
                source_path.unwrap_or_else(|| source_root_for(&path, session.configured_root()))
            });
            let definition = inspect_definition(
                session.source(),
                &path,
                root.as_deref().map(|root| (root, session.extension())),
            )?;

            if session.json {
                for warning in &definition.warnings {
                    output::emit(output::warning_event("inspect", warning))?;
                }
                output::emit(json!({
                    "event": "data",
                    "command": "inspect",
                    "name": definition.name,
                    "path": definition.path.display().to_string(),
                    "resolved": root.is_some(),
                    "definition": Value::Mapping(definition.body),
                }))?;
            } else {
                print!("{}", output::render_definition_text(&definition)?);
            }
        }
        InspectCommand::PythonDictionary {
            path,
            definition,
            attribute,
            format,
        } => {
            let inspection =
                inspect_module(&path, format, definition.as_deref(), attribute.as_deref())?;

            if session.json {
                output::emit(json!({
                    "event": "data",
                    "command": "inspect",
                    "result": inspection,
                }))?;
            } else {
                print!("{}", output::render_inspection_text(&inspection)?);
            }
        }
    }
    Ok(())
}
