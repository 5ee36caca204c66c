//! Session-level errors.

use story_rules::{ContentLoadError, SceneValidationError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::session::Phase;

/// Errors returned by [`Session`](crate::Session) operations.
///
/// A rejected operation never leaves the player record partially changed.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Content(#[from] ContentLoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scene(#[from] SceneValidationError),

    #[error("no active session")]
    NoSession,

    #[error("cannot {operation} while {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: Phase,
    },

    #[error("choice {index} is not offered in scene '{scene}'")]
    NoSuchChoice { scene: String, index: usize },

    #[error("event '{event}' has no option {index}")]
    NoSuchEventOption { event: String, index: usize },
}
