//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] over an optional file path. Without a path
//! (no argument on the command line) the defaults are used and saving is
//! refused.
//!
//! Every loaded or saved config passes
//! [`validate_config`](crate::config::validate_config) first.

use std::path::PathBuf;

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::{SystemConfig, validate_config};

pub struct JsonConfigStore {
    path: Option<PathBuf>,
}

impl JsonConfigStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl ConfigPort for JsonConfigStore {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let Some(path) = &self.path else {
            info!("config: no file given, using defaults");
            return Ok(SystemConfig::default());
        };
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound);
            }
            Err(e) => {
                warn!("config: cannot read {}: {}", path.display(), e);
                return Err(ConfigError::IoError);
            }
        };
        let cfg: SystemConfig = serde_json::from_str(&text).map_err(|e| {
            warn!("config: {} is not valid: {}", path.display(), e);
            ConfigError::Corrupted
        })?;
        validate_config(&cfg)?;
        info!("config: loaded {}", path.display());
        Ok(cfg)
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        validate_config(config)?;
        let Some(path) = &self.path else {
            return Err(ConfigError::IoError);
        };
        let text = serde_json::to_string(config).map_err(|_| ConfigError::Corrupted)?;
        std::fs::write(path, text).map_err(|e| {
            warn!("config: cannot write {}: {}", path.display(), e);
            ConfigError::IoError
        })?;
        info!("config: saved {}", path.display());
        Ok(())
    }
}
