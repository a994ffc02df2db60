//! Configuration file loading
//!
//! Raw TOML structure and the multi-source loader. The file layout:
//!
//! ```toml
//! [retry]
//! max_attempts = 3
//! max_message_length = 2000
//! include_hints = true
//!
//! [structured_output]
//! max_depth = 10
//! max_size = 65536
//! timeout_ms = 100
//! ```
//!
//! Sources merge lowest-to-highest priority: built-in defaults, the global
//! config under the platform config directory, a project-level
//! `argos.toml`/`.argos.toml`, an explicit `--config` path, and finally
//! `ARGOS_`-prefixed environment variables.

use argos_application::config::{ConfigError, RetryConfig, TransformLimits};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Retry and feedback settings
    pub retry: RetryConfig,
    /// Guided-decoding transformer limits
    pub structured_output: TransformLimits,
}

impl FileConfig {
    /// Validate and split into the typed configs the core consumes.
    pub fn into_configs(self) -> Result<(RetryConfig, TransformLimits), ConfigError> {
        self.retry.validate()?;
        self.structured_output.validate()?;
        Ok((self.retry, self.structured_output))
    }
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `ARGOS_`-prefixed environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./argos.toml` or `./.argos.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/argos/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        for filename in &["argos.toml", ".argos.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
                break;
            }
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("ARGOS_").split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("argos").join("config.toml"))
    }
}
