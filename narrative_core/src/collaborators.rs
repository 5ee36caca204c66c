//! Optional collaborators the session reports to.
//!
//! Every hook has a no-op default, so a session without a display or audio
//! attached behaves exactly like one with them.

use serde::{Deserialize, Serialize};

use crate::session::{EventView, SceneView};

/// Consumer of rendered scene and event payloads.
pub trait DisplaySurface {
    fn show_scene(&mut self, _view: &SceneView) {}

    fn show_event(&mut self, _view: &EventView) {}

    /// Result text of a resolved event option.
    fn show_event_result(&mut self, _text: &str) {}

    /// Status line, refreshed after every state change.
    fn show_hud(&mut self, _line: &str) {}

    /// Short-lived feedback, e.g. "Item added: key".
    fn show_message(&mut self, _text: &str) {}

    /// A content problem the player should see.
    fn show_diagnostic(&mut self, _text: &str) {}
}

/// Display that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDisplay;

impl DisplaySurface for NullDisplay {}

/// Fire-and-forget sound cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    SceneChange,
    EventStart,
    Damage,
    ItemGained,
}

/// Receiver of sound cues.
pub trait AudioSink {
    fn play(&mut self, _cue: Cue) {}
}

/// Audio sink that plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silence;

impl AudioSink for Silence {}
