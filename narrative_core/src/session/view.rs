//! Session phases and the renderable payloads handed to the display.

use serde::{Deserialize, Serialize};
use story_rules::{EffectOutcome, PlayerState, RandomEvent, Scene};

/// Where the state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No session is running.
    Idle,
    /// A scene with at least one presentable choice is shown.
    AwaitingChoice,
    /// A choice is being resolved. Never observed between calls.
    Transitioning,
    /// A random event overlays the current scene and must be resolved first.
    EventOverlay {
        /// Index into the content store's event pool.
        event: usize,
    },
    /// The current scene offers no presentable choice.
    Terminal,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::AwaitingChoice => write!(f, "awaiting a choice"),
            Phase::Transitioning => write!(f, "transitioning"),
            Phase::EventOverlay { .. } => write!(f, "an event is shown"),
            Phase::Terminal => write!(f, "at a terminal scene"),
        }
    }
}

/// A selectable choice as offered to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceView {
    /// Position in the presentable list; pass this to `resolve_choice`.
    pub index: usize,
    pub text: String,
}

/// A scene ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneView {
    pub scene_id: String,
    pub text: String,
    pub choices: Vec<ChoiceView>,
}

impl SceneView {
    /// Build the view of `scene` for the player's current inventory.
    pub fn new(scene: &Scene, player: &PlayerState) -> Self {
        Self {
            scene_id: scene.id.clone(),
            text: scene.text.clone(),
            choices: scene
                .presentable_choices(&player.inventory)
                .enumerate()
                .map(|(index, (_, choice))| ChoiceView {
                    index,
                    text: choice.text.clone(),
                })
                .collect(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.choices.is_empty()
    }
}

/// A random event ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventView {
    pub event_id: String,
    pub text: String,
    /// One label per option, or a single "Continue".
    pub options: Vec<String>,
}

impl From<&RandomEvent> for EventView {
    fn from(event: &RandomEvent) -> Self {
        Self {
            event_id: event.id.clone(),
            text: event.text.clone(),
            options: event.option_labels(),
        }
    }
}

/// What the caller should show next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    Scene(SceneView),
    Event(EventView),
}

impl Presentation {
    pub fn as_scene(&self) -> Option<&SceneView> {
        match self {
            Presentation::Scene(view) => Some(view),
            Presentation::Event(_) => None,
        }
    }

    pub fn as_event(&self) -> Option<&EventView> {
        match self {
            Presentation::Event(view) => Some(view),
            Presentation::Scene(_) => None,
        }
    }
}

/// Result of resolving an event option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventResolution {
    pub event_id: String,
    pub option: String,
    pub result: String,
    pub outcome: EffectOutcome,
    /// The scene the story resumes at.
    pub scene: SceneView,
}
