//! ifcfgctl settings
//!
//! Defaults, then an optional settings file, then `IFCFG_*` environment
//! variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ifcfg_network_config::DEFAULT_CONFIG_DIR;

/// Settings file looked up when none is given (any format the config crate knows)
pub const DEFAULT_SETTINGS_PATH: &str = "/etc/ifcfg/ifcfgctl";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "IFCFG";

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid setting {field}: {message}")]
    Invalid { field: String, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding ifcfg-<name> files
    pub config_dir: PathBuf,
    pub ifup_path: String,
    pub ifdown_path: String,
    /// Timeout for a single ifup/ifdown run
    pub command_timeout_secs: u64,
    /// Where transaction logs go; disabled when unset
    pub transaction_log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            ifup_path: "/sbin/ifup".to_string(),
            ifdown_path: "/sbin/ifdown".to_string(),
            command_timeout_secs: 60,
            transaction_log_dir: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the default location if it exists
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let file = match path {
            Some(path) => config::File::from(path),
            None => config::File::with_name(DEFAULT_SETTINGS_PATH).required(false),
        };

        let settings: Settings = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.command_timeout_secs == 0 {
            return Err(SettingsError::Invalid {
                field: "command_timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}
