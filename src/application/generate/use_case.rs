//! Generate Use Case
//!
//! Orchestrates the generate flow:
//! 1. Pick the models (explicit list or discovery)
//! 2. Resolve them as one batch sharing a cache
//! 3. Overlay the result on the existing module unless resetting
//! 4. Write the module atomically

use std::path::PathBuf;

use crate::domain::ports::DocumentSource;
use crate::domain::services::RequirementResolver;
use crate::error::FactoryResult;
use crate::infrastructure::codegen::{resolve_format, DefinitionsModule};

use super::options::GenerateOptions;
use super::result::GenerateResult;

/// Generate use case, parameterized by the document source.
pub struct GenerateUseCase<S: DocumentSource> {
    source: S,
}

impl<S: DocumentSource> GenerateUseCase<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Execute the generate use case.
    ///
    /// Models that fail are reported in the result; the others are still
    /// written. Errors are returned only when nothing can be written.
    pub fn execute(&self, options: &GenerateOptions) -> FactoryResult<GenerateResult> {
        let format = resolve_format(options.format, &options.output)?;
        let paths = self.manifest(options)?;
        tracing::info!(
            models = paths.len(),
            source = %options.source_path.display(),
            "generating definitions"
        );

        let mut resolver = RequirementResolver::new(&self.source, &options.source_path)
            .with_extension(options.extension.as_str());
        let batch = resolver.resolve_manifest(&paths);

        let mut module = if options.reset || !options.output.is_file() {
            DefinitionsModule::new()
        } else {
            DefinitionsModule::read(&options.output, format)?
        };

        let generated: Vec<String> = batch
            .resolved
            .iter()
            .map(|document| document.name().as_str().to_string())
            .collect();
        module.overlay(DefinitionsModule::from_documents(batch.resolved));
        module.write(&options.output, format, &options.variable)?;

        Ok(GenerateResult {
            output: options.output.clone(),
            format,
            generated,
            module_size: module.len(),
            failures: batch.failures,
            warnings: batch.warnings,
        })
    }

    fn manifest(&self, options: &GenerateOptions) -> FactoryResult<Vec<PathBuf>> {
        if options.definitions.is_empty() {
            return Ok(self.source.discover(&options.source_path)?);
        }
        Ok(options.definitions.clone())
    }
}
