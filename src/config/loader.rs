//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

pub use crate::domain::value_objects::ConfigWarning;

use super::types::Config;

/// Project config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "defactory.toml";

/// User config location below the platform config directory.
pub const USER_CONFIG_PATH: &str = "defactory/config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Configuration plus where it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: Config,
    pub file: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|key| {
            let leaf = key.rsplit('.').next().unwrap_or(key.as_str()).to_string();
            ConfigWarning {
                line: find_line_number(&content, &leaf),
                suggestion: suggest_key(&leaf),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load the effective configuration.
///
/// An explicit file must exist. Otherwise the project file in
/// `working_dir` is used, then the user file, then defaults. Environment
/// overrides apply on top in every case.
pub fn load_layered(
    explicit: Option<&Path>,
    working_dir: &Path,
) -> Result<LoadedConfig, ConfigError> {
    load_layered_with(explicit, working_dir, user_config_path(), &env_var)
}

pub(crate) fn load_layered_with(
    explicit: Option<&Path>,
    working_dir: &Path,
    user_config: Option<PathBuf>,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<LoadedConfig, ConfigError> {
    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let project = working_dir.join(PROJECT_CONFIG_FILE);
            if project.is_file() {
                Some(project)
            } else {
                user_config.filter(|path| path.is_file())
            }
        }
    };

    let mut loaded = LoadedConfig::default();
    if let Some(path) = candidate {
        let (config, warnings) = load_with_warnings(&path)?;
        loaded.config = config;
        loaded.warnings = warnings;
        loaded.file = Some(path);
    }
    loaded.config = apply_env(loaded.config, env);
    Ok(loaded)
}

/// Apply environment variable overrides (DEFACTORY_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_env(config, &env_var)
}

fn apply_env(mut config: Config, env: &dyn Fn(&str) -> Option<String>) -> Config {
    // DEFACTORY_SOURCE_PATH
    if let Some(path) = env("DEFACTORY_SOURCE_PATH").filter(|v| !v.is_empty()) {
        config.source.path = Some(PathBuf::from(path));
    }

    // DEFACTORY_SOURCE_EXTENSION
    if let Some(extension) = env("DEFACTORY_SOURCE_EXTENSION") {
        let extension = extension.trim().trim_start_matches('.');
        if !extension.is_empty() {
            config.source.extension = extension.to_string();
        }
    }

    // DEFACTORY_OUTPUT_FORMAT
    if let Some(format) = env("DEFACTORY_OUTPUT_FORMAT") {
        if let Ok(format) = format.parse() {
            config.generate.format = Some(format);
        }
    }

    // DEFACTORY_LOG_LEVEL
    if let Some(level) = env("DEFACTORY_LOG_LEVEL").filter(|v| !v.is_empty()) {
        config.log.level = Some(level);
    }

    // DEFACTORY_LOG_FILE
    if let Some(file) = env("DEFACTORY_LOG_FILE").filter(|v| !v.is_empty()) {
        config.log.file = Some(PathBuf::from(file));
    }

    config
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(USER_CONFIG_PATH))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.trim_start().starts_with(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "source",
        "path",
        "extension",
        "generate",
        "output",
        "format",
        "variable",
        "definitions",
        "log",
        "level",
        "file",
    ];

    let mut best: Option<(&str, usize)> = None;
    for &candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
