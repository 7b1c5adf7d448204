//! Battle configuration files.
//!
//! A config file is a JSON `SimConfig`. Every field is optional; missing
//! fields take their defaults.

use std::fs;
use std::path::Path;

use thiserror::Error;

use bastion_sim::SimConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub fn parse_config(json: &str) -> Result<SimConfig, serde_json::Error> {
    serde_json::from_str(json)
}

pub fn load_config(path: &Path) -> Result<SimConfig, ConfigError> {
    let display = path.display().to_string();
    let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: display.clone(),
        source,
    })?;
    let config = parse_config(&json).map_err(|source| ConfigError::Parse {
        path: display,
        source,
    })?;
    tracing::info!(path = %path.display(), seed = config.seed, "loaded battle config");
    Ok(config)
}
