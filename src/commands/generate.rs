//! Generate command handler

use std::path::PathBuf;

use anyhow::{bail, Result};

use definition_factory::application::{GenerateOptions, GenerateUseCase};
use definition_factory::presentation::output;
use definition_factory::{FactoryError, OutputFormat};

use super::Session;

pub struct GenerateArgs {
    pub source_path: Option<PathBuf>,
    pub definitions: Vec<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub reset_definitions: bool,
    pub format: Option<OutputFormat>,
    pub variable: Option<String>,
}

pub fn cmd_generate(session: &Session, args: GenerateArgs) -> Result<()> {
    let settings = &session.config.generate;
    let source_path = session.source_path(args.source_path.as_deref())?;
    let Some(output_file) = args.output_file.or_else(|| settings.output.clone()) else {
        bail!(
            "no output file given\n  → Fix: pass --output-file FILE or set `output` under [generate] in defactory.toml"
        );
    };
    let definitions = if args.definitions.is_empty() {
        settings.definitions.clone()
    } else {
        args.definitions
    };

    let options = GenerateOptions::new(source_path, output_file)
        .with_definitions(definitions)
        .with_format(args.format.or(settings.format))
        .with_variable(args.variable.unwrap_or_else(|| settings.variable.clone()))
        .with_extension(session.extension())
        .with_reset(args.reset_definitions);

    let result = GenerateUseCase::new(session.source()).execute(&options)?;

    if session.json {
        for event in output::generate_events(&result) {
            output::emit(event)?;
        }
    } else {
        print!("{}", output::render_generate_text(&result));
    }

    if !result.is_success() {
        return Err(FactoryError::PartialFailure {
            failed: result.failures.len(),
            total: result.total(),
        }
        .into());
    }
    Ok(())
}
