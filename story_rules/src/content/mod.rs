//! Content store - the scene graph and random event pool.
//!
//! Scenes are kept as raw JSON until they are first about to render. At that
//! point they are validated once and cached; a malformed scene the player never
//! reaches never blocks the story. The event pool is parsed eagerly at load.

mod event;
mod scene;

pub use event::*;
pub use scene::*;

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::player::START_SCENE;

/// Errors from loading scene graphs and event pools.
#[derive(Debug, Error)]
pub enum ContentLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("scene graph must be an object keyed by scene id")]
    ScenesNotObject,

    #[error("scene graph contains no scenes")]
    NoScenes,

    #[error("scene graph has no 'start' scene")]
    MissingStart,

    #[error("event pool must be an object with an 'events' array")]
    InvalidEventPool,

    #[error("invalid event '{event}': {reason}")]
    InvalidEvent { event: String, reason: String },
}

/// Validated-on-demand scene graph plus the random event pool.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    raw_scenes: HashMap<String, Value>,
    validated: HashMap<String, Scene>,
    events: Vec<RandomEvent>,
}

impl ContentStore {
    /// Build a store from parsed documents. The event pool is optional.
    pub fn from_values(scenes: Value, events: Option<&Value>) -> Result<Self, ContentLoadError> {
        let Value::Object(map) = scenes else {
            return Err(ContentLoadError::ScenesNotObject);
        };
        if map.is_empty() {
            return Err(ContentLoadError::NoScenes);
        }
        if !map.contains_key(START_SCENE) {
            return Err(ContentLoadError::MissingStart);
        }

        let events = match events {
            Some(doc) => parse_event_pool(doc)?,
            None => Vec::new(),
        };

        tracing::info!(
            scenes = map.len(),
            events = events.len(),
            "content loaded"
        );

        Ok(Self {
            raw_scenes: map.into_iter().collect(),
            validated: HashMap::new(),
            events,
        })
    }

    /// Parse a scene graph and event pool from JSON text.
    pub fn from_json(scenes: &str, events: &str) -> Result<Self, ContentLoadError> {
        let scenes: Value = serde_json::from_str(scenes)?;
        let events: Value = serde_json::from_str(events)?;
        Self::from_values(scenes, Some(&events))
    }

    /// Parse a scene graph without any random events.
    pub fn from_scenes(scenes: &str) -> Result<Self, ContentLoadError> {
        let scenes: Value = serde_json::from_str(scenes)?;
        Self::from_values(scenes, None)
    }

    /// Load content from files on disk.
    pub fn load(
        scenes_path: impl AsRef<Path>,
        events_path: Option<&Path>,
    ) -> Result<Self, ContentLoadError> {
        let scenes = read_json(scenes_path.as_ref())?;
        let events = events_path.map(read_json).transpose()?;
        Self::from_values(scenes, events.as_ref())
    }

    /// Get a scene, validating it the first time it is requested.
    pub fn scene(&mut self, id: &str) -> Result<&Scene, SceneValidationError> {
        if !self.validated.contains_key(id) {
            let failure = |failure| SceneValidationError {
                scene_id: id.to_string(),
                failure,
            };

            let raw = self
                .raw_scenes
                .get(id)
                .ok_or_else(|| failure(ValidationFailure::Missing))?;
            let scene = parse_scene(id, raw).map_err(|f| {
                tracing::warn!(scene = %id, error = %f, "invalid scene detected");
                failure(f)
            })?;

            tracing::debug!(scene = %id, "scene validated");
            self.validated.insert(id.to_string(), scene);
        }

        Ok(&self.validated[id])
    }

    /// Check if a scene has already passed validation.
    pub fn is_validated(&self, id: &str) -> bool {
        self.validated.contains_key(id)
    }

    pub fn scene_count(&self) -> usize {
        self.raw_scenes.len()
    }

    pub fn events(&self) -> &[RandomEvent] {
        &self.events
    }

    pub fn event(&self, index: usize) -> Option<&RandomEvent> {
        self.events.get(index)
    }
}

fn read_json(path: &Path) -> Result<Value, ContentLoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| ContentLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// List the story files (`*.json`) in a content directory, sorted by name.
pub fn list_story_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, ContentLoadError> {
    let dir = dir.as_ref();
    let io_err = |source| ContentLoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
