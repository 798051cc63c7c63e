//! Configuration module
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (DEFACTORY_*)
//! 3. Project config (./defactory.toml)
//! 4. User config (<config dir>/defactory/config.toml)
//! 5. Built-in defaults (lowest priority)
//!
//! Only the first config file found is read.

mod loader;
mod types;

pub use loader::{
    load_layered, ConfigError, ConfigWarning, LoadedConfig, PROJECT_CONFIG_FILE, USER_CONFIG_PATH,
};
pub use types::{Config, GenerateConfig, LogConfig, SourceConfig};
