//! Generate Result

use std::path::PathBuf;

use crate::domain::services::ModelFailure;
use crate::domain::value_objects::ResolutionWarning;
use crate::infrastructure::codegen::OutputFormat;

/// Result of a generate run
#[derive(Debug)]
pub struct GenerateResult {
    /// File that was written
    pub output: PathBuf,
    pub format: OutputFormat,
    /// Names of the models resolved in this run
    pub generated: Vec<String>,
    /// Definitions in the written module, including kept ones
    pub module_size: usize,
    /// Models that failed to resolve
    pub failures: Vec<ModelFailure>,
    pub warnings: Vec<ResolutionWarning>,
}

impl GenerateResult {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Models attempted in this run.
    pub fn total(&self) -> usize {
        self.generated.len() + self.failures.len()
    }
}
