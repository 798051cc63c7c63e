//! Command handlers for the `defactory` binary.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use definition_factory::config::{self, Config};
use definition_factory::logging::{self, LogOptions};
use definition_factory::presentation::output;
use definition_factory::presentation::Cli;
use definition_factory::YamlDocumentSource;

pub mod analyse;
pub mod generate;
pub mod inspect;
pub mod visualise;

/// Settings shared by every command of one invocation.
pub struct Session {
    pub config: Config,
    pub json: bool,
}

impl Session {
    /// Load config, install logging and report config warnings.
    pub fn start(cli: &Cli) -> Result<Self> {
        let working_dir = std::env::current_dir()?;
        let loaded = config::load_layered(cli.config.as_deref(), &working_dir)?;

        logging::init(&LogOptions {
            verbosity: cli.verbose,
            level: loaded.config.log.level.clone(),
            file: cli.log_file.clone().or_else(|| loaded.config.log.file.clone()),
        })?;

        if let Some(file) = &loaded.file {
            tracing::debug!(file = %file.display(), "config loaded");
        }
        for warning in &loaded.warnings {
            if cli.json {
                output::emit(output::config_warning_event(warning))?;
            } else {
                eprintln!("⚠ {}", warning);
            }
        }

        Ok(Self {
            config: loaded.config,
            json: cli.json,
        })
    }

    pub fn source(&self) -> YamlDocumentSource {
        YamlDocumentSource::new().with_extension(self.config.source.extension.as_str())
    }

    pub fn extension(&self) -> &str {
        &self.config.source.extension
    }

    pub fn configured_root(&self) -> Option<&Path> {
        self.config.source.path.as_deref()
    }

    /// The flag value, else `[source] path`.
    pub fn source_path(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit.or_else(|| self.configured_root()) {
            Some(path) => Ok(path.to_path_buf()),
            None => bail!(
                "no source path given\n  → Fix: pass --source-path DIR or set `path` under [source] in defactory.toml"
            ),
        }
    }
}
