//! Narrative state machine.
//!
//! A [`Session`] owns the content store, the single live player record, the
//! scheduler, and the save slot. Callers drive it with [`Session::resolve_choice`]
//! and [`Session::resolve_event_choice`]; each call returns the next thing to show.
//!
//! ## Transition order
//!
//! 1. Validate the destination scene (rejection changes nothing)
//! 2. Apply stat deltas, then `adds`, then `removes`
//! 3. Move to the destination scene
//! 4. Save
//! 5. Roll for a random event overlay

mod view;

pub use view::*;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use story_rules::{
    apply_choice, Choice, ContentStore, Effect, EffectOutcome, PlayerState, SceneValidationError,
};
use uuid::Uuid;

use crate::collaborators::{AudioSink, Cue, DisplaySurface, NullDisplay, Silence};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::persistence::{FileSlot, PersistenceManager, SaveRecord, SaveSlot};
use crate::scheduler::EventScheduler;

/// Unique identifier for a session, attached to its log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The narrative state machine.
pub struct Session {
    id: SessionId,
    content: ContentStore,
    player: Option<PlayerState>,
    phase: Phase,
    scheduler: EventScheduler,
    persistence: PersistenceManager,
    rng: StdRng,
    display: Box<dyn DisplaySurface>,
    audio: Box<dyn AudioSink>,
}

impl Session {
    /// Create an idle session over loaded content.
    ///
    /// Defaults: in-memory save slot, entropy-seeded randomness, the default
    /// interrupt probability, and no display or audio attached.
    pub fn new(content: ContentStore) -> Self {
        Self {
            id: SessionId::new(),
            content,
            player: None,
            phase: Phase::Idle,
            scheduler: EventScheduler::default(),
            persistence: PersistenceManager::default(),
            rng: StdRng::from_entropy(),
            display: Box::new(NullDisplay),
            audio: Box::new(Silence),
        }
    }

    /// Load content and wire the save slot as described by `config`.
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let content = ContentStore::load(&config.scenes_path, config.events_path.as_deref())?;
        let mut session =
            Self::new(content).with_interrupt_probability(config.interrupt_probability);

        if let Some(seed) = config.seed {
            session = session.with_seed(seed);
        }
        if let Some(path) = &config.save_path {
            session = session.with_save_slot(FileSlot::new(path.clone()));
        }

        Ok(session)
    }

    pub fn with_display(mut self, display: impl DisplaySurface + 'static) -> Self {
        self.display = Box::new(display);
        self
    }

    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn with_save_slot(mut self, slot: impl SaveSlot + 'static) -> Self {
        self.persistence = PersistenceManager::new(slot);
        self
    }

    /// Seed the random source for a reproducible session.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_interrupt_probability(mut self, probability: f64) -> Self {
        self.scheduler = EventScheduler::new(probability);
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The live player record, if a session is running.
    pub fn player(&self) -> Option<&PlayerState> {
        self.player.as_ref()
    }

    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    pub fn persistence(&self) -> &PersistenceManager {
        &self.persistence
    }

    /// Peek at the stored save, e.g. to offer "Continue".
    pub fn saved_game(&self) -> Option<SaveRecord> {
        self.persistence.load()
    }

    /// Start over at the first scene, discarding any stored save.
    pub fn new_game(&mut self) -> Result<Presentation, EngineError> {
        tracing::info!(session = %self.id, "starting new game");
        self.persistence.clear();
        self.begin(PlayerState::new())
    }

    /// Resume from a save record.
    pub fn continue_game(&mut self, record: SaveRecord) -> Result<Presentation, EngineError> {
        tracing::info!(
            session = %self.id,
            scene = %record.current_scene,
            "continuing saved game"
        );
        self.begin(record.into_player())
    }

    /// Resume from the stored save. Returns `None` when there is nothing usable.
    pub fn continue_saved(&mut self) -> Result<Option<Presentation>, EngineError> {
        match self.persistence.load() {
            Some(record) => self.continue_game(record).map(Some),
            None => Ok(None),
        }
    }

    /// Discard the live player record and return to idle.
    pub fn end_session(&mut self) {
        tracing::info!(session = %self.id, "session ended");
        self.player = None;
        self.phase = Phase::Idle;
    }

    /// Re-render whatever is currently shown.
    pub fn presentation(&mut self) -> Result<Presentation, EngineError> {
        match self.phase {
            Phase::Idle => Err(EngineError::NoSession),
            Phase::EventOverlay { event } => self
                .content
                .event(event)
                .map(|e| Presentation::Event(EventView::from(e)))
                .ok_or(EngineError::NoSession),
            _ => {
                let player = self.player.as_ref().ok_or(EngineError::NoSession)?;
                let view = render_scene(&mut self.content, player)?;
                Ok(Presentation::Scene(view))
            }
        }
    }

    /// Resolve the presentable choice at `index` of the current scene.
    pub fn resolve_choice(&mut self, index: usize) -> Result<Presentation, EngineError> {
        self.require(Phase::AwaitingChoice, "resolve a choice")?;

        let player = self.player.as_mut().ok_or(EngineError::NoSession)?;
        let current = player.current_scene.clone();

        let choice: Choice = self
            .content
            .scene(&current)?
            .presentable_choices(&player.inventory)
            .nth(index)
            .map(|(_, choice)| choice.clone())
            .ok_or_else(|| EngineError::NoSuchChoice {
                scene: current.clone(),
                index,
            })?;

        let destination = choice
            .next_scene
            .clone()
            .unwrap_or_else(|| current.clone());

        if let Some(e) = self.content.scene(&destination).err() {
            return Err(reject(self.display.as_mut(), e));
        }

        tracing::debug!(
            session = %self.id,
            from = %current,
            to = %destination,
            choice = %choice.text,
            "resolving choice"
        );
        self.phase = Phase::Transitioning;

        let outcome = apply_choice(&choice, player, &mut self.rng);
        player.current_scene = destination;

        announce_choice(self.display.as_mut(), &choice);
        play_outcome(self.audio.as_mut(), &outcome);
        if player.current_scene != current {
            self.audio.play(Cue::SceneChange);
        }
        if self.persistence.save(player) {
            self.display.show_message("Progress saved");
        }

        let rolled = self.scheduler.roll(self.content.events(), &mut self.rng);
        if let Some((event, view)) =
            rolled.and_then(|i| self.content.event(i).map(|e| (i, EventView::from(e))))
        {
            tracing::info!(session = %self.id, event = %view.event_id, "random event triggered");
            self.phase = Phase::EventOverlay { event };
            self.display.show_event(&view);
            self.display.show_hud(&player.hud_line());
            self.audio.play(Cue::EventStart);
            return Ok(Presentation::Event(view));
        }

        let view = render_scene(&mut self.content, player)?;
        Ok(Presentation::Scene(self.settle(view)))
    }

    /// Resolve option `index` of the event currently overlaying the scene.
    pub fn resolve_event_choice(&mut self, index: usize) -> Result<EventResolution, EngineError> {
        let event = match self.phase {
            Phase::EventOverlay { event } => event,
            Phase::Idle => return Err(EngineError::NoSession),
            phase => {
                return Err(EngineError::InvalidPhase {
                    operation: "resolve an event option",
                    phase,
                })
            }
        };

        let random_event = self
            .content
            .event(event)
            .ok_or_else(|| EngineError::NoSuchEventOption {
                event: event.to_string(),
                index,
            })?;
        let event_id = random_event.id.clone();
        let option = random_event
            .option(index)
            .ok_or_else(|| EngineError::NoSuchEventOption {
                event: event_id.clone(),
                index,
            })?;

        let player = self.player.as_mut().ok_or(EngineError::NoSession)?;
        let outcome = match &option.effect {
            Some(effect) => effect.apply(player, &mut self.rng),
            None => EffectOutcome::default(),
        };

        tracing::debug!(
            session = %self.id,
            event = %event_id,
            option = %option.text,
            health = player.health(),
            "event resolved"
        );

        if let Some(effect) = &option.effect {
            announce_event_effect(self.display.as_mut(), effect, &outcome);
        }
        play_outcome(self.audio.as_mut(), &outcome);
        self.persistence.save(player);

        let result = option.result_text().to_string();
        self.display.show_event_result(&result);

        let view = render_scene(&mut self.content, player)
            .map_err(|e| reject(self.display.as_mut(), e))?;
        let scene = self.settle(view);

        Ok(EventResolution {
            event_id,
            option: option.text,
            result,
            outcome,
            scene,
        })
    }

    fn require(&self, expected: Phase, operation: &'static str) -> Result<(), EngineError> {
        if self.phase == expected {
            Ok(())
        } else if self.phase == Phase::Idle {
            Err(EngineError::NoSession)
        } else {
            Err(EngineError::InvalidPhase {
                operation,
                phase: self.phase,
            })
        }
    }

    /// Install `player` at its scene, or leave the session idle if that scene
    /// cannot be shown.
    fn begin(&mut self, player: PlayerState) -> Result<Presentation, EngineError> {
        self.player = None;
        self.phase = Phase::Idle;

        let view = match render_scene(&mut self.content, &player) {
            Ok(view) => view,
            Err(e) => return Err(reject(self.display.as_mut(), e)),
        };

        self.player = Some(player);
        Ok(Presentation::Scene(self.settle(view)))
    }

    /// Enter `AwaitingChoice` or `Terminal` for a rendered scene and show it.
    fn settle(&mut self, view: SceneView) -> SceneView {
        self.phase = if view.is_terminal() {
            tracing::info!(session = %self.id, scene = %view.scene_id, "reached terminal scene");
            Phase::Terminal
        } else {
            Phase::AwaitingChoice
        };

        self.display.show_scene(&view);
        if let Some(player) = &self.player {
            self.display.show_hud(&player.hud_line());
        }
        view
    }
}

fn render_scene(
    content: &mut ContentStore,
    player: &PlayerState,
) -> Result<SceneView, SceneValidationError> {
    content
        .scene(&player.current_scene)
        .map(|scene| SceneView::new(scene, player))
}

fn reject(display: &mut dyn DisplaySurface, e: SceneValidationError) -> EngineError {
    tracing::warn!(scene = %e.scene_id, error = %e.failure, "transition rejected");
    display.show_diagnostic(&format!("Scene data error: {}", e));
    e.into()
}

fn announce_choice(display: &mut dyn DisplaySurface, choice: &Choice) {
    if let Some(effect) = &choice.effect {
        display.show_message(&format!("Effect: {}", effect.describe()));
    }
    if !choice.adds.is_empty() {
        display.show_message(&format!("Item added: {}", choice.adds.join(", ")));
    }
    if !choice.removes.is_empty() {
        display.show_message(&format!("Item used: {}", choice.removes.join(", ")));
    }
}

fn announce_event_effect(display: &mut dyn DisplaySurface, effect: &Effect, outcome: &EffectOutcome) {
    let text = match (effect, outcome.damage_rolled) {
        (Effect::RandomDamage { .. }, Some(rolled)) => format!("health -{}", rolled),
        _ => effect.describe(),
    };
    display.show_message(&format!("Effect: {}", text));
}

fn play_outcome(audio: &mut dyn AudioSink, outcome: &EffectOutcome) {
    if outcome.health_change < 0 {
        audio.play(Cue::Damage);
    }
    if !outcome.items_gained.is_empty() {
        audio.play(Cue::ItemGained);
    }
}
