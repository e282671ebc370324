//! TOML configuration for the `mortgage` binary.
//!
//! ```toml
//! [validation]
//! min_amount = 1000
//! min_term = 1
//! max_term = 50
//! max_rate = 30
//!
//! [logging]
//! level = "info"
//! file = "mortgage.log"
//! ```
//!
//! Every section and key is optional; missing values fall back to the
//! defaults. Unknown keys are rejected so typos do not pass silently.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mortgage_core::{RulesError, ValidationRules};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Configuration file looked up in the working directory when `--config` is
/// not given.
pub const DEFAULT_CONFIG_FILE: &str = "mortgage.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid validation limits: {0}")]
    Rules(#[from] RulesError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// EnvFilter directive, e.g. `"debug"` or `"info,mortgage_core=debug"`.
    /// Unset leaves `RUST_LOG` (or the built-in default) in charge.
    pub level: Option<String>,
    /// Append log output to this file as well as the console.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub validation: ValidationRules,
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Parses configuration text. `origin` is only used in error messages.
    pub fn from_toml_str(
        text: &str,
        origin: &Path,
    ) -> Result<Self, ConfigError> {
        let config: CliConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validation.validate()?;
        Ok(config)
    }

    /// Reads and parses the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text, path)?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Like [`load`](Self::load), but a file that does not exist yields the
    /// defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }
}
