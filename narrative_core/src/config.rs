//! Engine configuration, read from TOML.
//!
//! ```toml
//! interrupt_probability = 0.3
//! seed = 42
//! scenes_path = "games/demo.json"
//! events_path = "events/defaultEvents.json"
//! save_path = "saves/slot.json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::scheduler::DEFAULT_INTERRUPT_PROBABILITY;

/// Errors from reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("interrupt_probability must be between 0 and 1, got {0}")]
    InvalidProbability(f64),
}

/// Settings for a narrative session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Chance of a random event after each transition.
    pub interrupt_probability: f64,

    /// Fixed seed for a reproducible session. Drawn from entropy when absent.
    pub seed: Option<u64>,

    pub scenes_path: PathBuf,

    /// Random event pool. No events when absent.
    pub events_path: Option<PathBuf>,

    /// Save slot file. Saves are kept in memory when absent.
    pub save_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interrupt_probability: DEFAULT_INTERRUPT_PROBABILITY,
            seed: None,
            scenes_path: PathBuf::from("games/demo.json"),
            events_path: Some(PathBuf::from("events/defaultEvents.json")),
            save_path: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.interrupt_probability) {
            return Err(ConfigError::InvalidProbability(self.interrupt_probability));
        }
        Ok(())
    }
}
