//! Persistence manager - the single save slot.
//!
//! Saving is write-through after each committed transition and never fails a
//! transition: a failed write is logged and skipped, a failed read behaves as
//! "no save present".

mod slot;

pub use slot::*;

use serde::{Deserialize, Serialize};
use story_rules::PlayerState;
use thiserror::Error;

/// Errors from save slot operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Snapshot of the player record, in the on-disk save schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    pub current_scene: String,
    pub health: i64,
    pub score: i64,
    pub inventory: Vec<String>,
}

impl From<&PlayerState> for SaveRecord {
    fn from(player: &PlayerState) -> Self {
        Self {
            current_scene: player.current_scene.clone(),
            health: player.health(),
            score: player.score,
            inventory: player.inventory.as_slice().to_vec(),
        }
    }
}

impl SaveRecord {
    /// Restore a player from this record.
    ///
    /// Negative health is clamped and duplicate items dropped.
    pub fn into_player(self) -> PlayerState {
        PlayerState::from_parts(self.current_scene, self.health, self.score, self.inventory)
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(data: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(data)?)
    }
}

/// Serializes the player record to a save slot and reads it back.
pub struct PersistenceManager {
    slot: Box<dyn SaveSlot>,
}

impl std::fmt::Debug for PersistenceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceManager").finish_non_exhaustive()
    }
}

impl Default for PersistenceManager {
    fn default() -> Self {
        Self::new(MemorySlot::default())
    }
}

impl PersistenceManager {
    pub fn new(slot: impl SaveSlot + 'static) -> Self {
        Self {
            slot: Box::new(slot),
        }
    }

    /// Write the player record, overwriting any previous save.
    pub fn try_save(&mut self, player: &PlayerState) -> Result<SaveRecord, PersistError> {
        let record = SaveRecord::from(player);
        self.slot.write(&record.to_json()?)?;
        Ok(record)
    }

    /// Write the player record, logging and swallowing any failure.
    ///
    /// Returns `true` if the save landed.
    pub fn save(&mut self, player: &PlayerState) -> bool {
        match self.try_save(player) {
            Ok(record) => {
                tracing::debug!(scene = %record.current_scene, "game saved");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "save failed, continuing unsaved");
                false
            }
        }
    }

    /// Read the stored record, if any.
    pub fn try_load(&self) -> Result<Option<SaveRecord>, PersistError> {
        self.slot
            .read()?
            .map(|data| SaveRecord::from_json(&data))
            .transpose()
    }

    /// Read the stored record; any failure reads as "no save present".
    pub fn load(&self) -> Option<SaveRecord> {
        match self.try_load() {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "load failed, treating as no save");
                None
            }
        }
    }

    /// Remove the stored record.
    pub fn clear(&mut self) {
        match self.slot.clear() {
            Ok(()) => tracing::info!("save data cleared"),
            Err(e) => tracing::warn!(error = %e, "failed to clear save data"),
        }
    }
}
