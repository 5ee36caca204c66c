//! Player record: current scene, stats, and inventory.

mod inventory;

pub use inventory::*;

use serde::{Deserialize, Serialize};

/// Scene every new game begins at.
pub const START_SCENE: &str = "start";

/// Health a new game begins with.
pub const DEFAULT_HEALTH: i64 = 100;

/// The mutable session record.
///
/// Health is floored at zero by every mutator on this type; there is no ceiling.
/// Score is unbounded in both directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPlayerState")]
pub struct PlayerState {
    pub current_scene: String,
    health: i64,
    pub score: i64,
    pub inventory: Inventory,
}

// Deserialize through `from_parts` so the health floor holds.
#[derive(Deserialize)]
struct RawPlayerState {
    current_scene: String,
    health: i64,
    score: i64,
    inventory: Vec<String>,
}

impl From<RawPlayerState> for PlayerState {
    fn from(raw: RawPlayerState) -> Self {
        Self::from_parts(raw.current_scene, raw.health, raw.score, raw.inventory)
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            current_scene: START_SCENE.to_string(),
            health: DEFAULT_HEALTH,
            score: 0,
            inventory: Inventory::new(),
        }
    }
}

impl PlayerState {
    /// Create a player with the canonical new-game defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a player from raw parts, clamping health and dropping duplicate items.
    pub fn from_parts(
        current_scene: impl Into<String>,
        health: i64,
        score: i64,
        items: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            current_scene: current_scene.into(),
            health: health.max(0),
            score,
            inventory: items.into_iter().collect(),
        }
    }

    /// Current health, never negative.
    pub fn health(&self) -> i64 {
        self.health
    }

    /// Set health directly, clamped at zero.
    pub fn set_health(&mut self, health: i64) {
        self.health = health.max(0);
    }

    /// Shift health by a signed amount. Returns the change actually applied.
    pub fn adjust_health(&mut self, delta: i64) -> i64 {
        let before = self.health;
        self.health = before.saturating_add(delta).max(0);
        self.health - before
    }

    /// Shift score by a signed amount.
    pub fn adjust_score(&mut self, delta: i64) {
        self.score = self.score.saturating_add(delta);
    }

    /// One-line status summary for a heads-up display.
    pub fn hud_line(&self) -> String {
        let items = if self.inventory.is_empty() {
            "None".to_string()
        } else {
            self.inventory.join(", ")
        };
        format!(
            "Scene: {} | Health: {} | Score: {} | Inventory: {}",
            self.current_scene, self.health, self.score, items
        )
    }
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hud_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_defaults() {
        let player = PlayerState::new();
        assert_eq!(player.current_scene, "start");
        assert_eq!(player.health(), 100);
        assert_eq!(player.score, 0);
        assert!(player.inventory.is_empty());
    }

    #[test]
    fn test_health_floor() {
        let mut player = PlayerState::new();
        let applied = player.adjust_health(-150);
        assert_eq!(player.health(), 0);
        assert_eq!(applied, -100);

        player.set_health(-5);
        assert_eq!(player.health(), 0);
    }

    #[test]
    fn test_health_has_no_ceiling() {
        let mut player = PlayerState::new();
        player.adjust_health(50);
        assert_eq!(player.health(), 150);
    }

    #[test]
    fn test_from_parts_normalizes() {
        let player = PlayerState::from_parts(
            "hall",
            -20,
            -3,
            vec!["key".to_string(), "torch".to_string(), "key".to_string()],
        );
        assert_eq!(player.health(), 0);
        assert_eq!(player.score, -3);
        assert_eq!(player.inventory.as_slice(), ["key", "torch"]);
    }

    #[test]
    fn test_deserialize_normalizes() {
        let player: PlayerState = serde_json::from_str(
            r#"{"current_scene":"start","health":-40,"score":2,"inventory":["rope","rope"]}"#,
        )
        .unwrap();

        assert_eq!(player.health(), 0);
        assert_eq!(player.score, 2);
        assert_eq!(player.inventory.as_slice(), ["rope"]);

        let json = serde_json::to_string(&player).unwrap();
        assert_eq!(serde_json::from_str::<PlayerState>(&json).unwrap(), player);
    }

    #[test]
    fn test_hud_line() {
        let mut player = PlayerState::new();
        assert_eq!(
            player.hud_line(),
            "Scene: start | Health: 100 | Score: 0 | Inventory: None"
        );

        player.inventory.insert("key");
        player.inventory.insert("map");
        player.adjust_score(5);
        assert_eq!(
            player.to_string(),
            "Scene: start | Health: 100 | Score: 5 | Inventory: key, map"
        );
    }
}
