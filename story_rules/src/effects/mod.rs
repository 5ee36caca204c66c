//! Effect interpretation: how choices and events change the player record.

use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::content::Choice;
use crate::player::PlayerState;

/// Stats addressable from a stat-delta effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Health,
    Score,
}

impl Stat {
    /// Resolve a content key to a stat. Unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "health" => Some(Stat::Health),
            "score" => Some(Stat::Score),
            _ => None,
        }
    }
}

/// A described mutation of the player record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Additive, independent stat changes keyed by stat name, in authored order.
    StatDelta { deltas: IndexMap<String, i64> },
    /// Add an item unless already held.
    ItemGain { item: String },
    ScoreGain { amount: i64 },
    /// Fixed damage, health floored at zero.
    Damage { amount: i64 },
    /// Damage drawn uniformly from `[0, upper_bound)` when applied.
    RandomDamage { upper_bound: i64 },
}

/// What an applied effect actually changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectOutcome {
    /// Net health change after clamping.
    pub health_change: i64,
    pub score_change: i64,
    pub items_gained: Vec<String>,
    pub items_removed: Vec<String>,
    /// The amount drawn by a random damage effect.
    pub damage_rolled: Option<i64>,
}

impl EffectOutcome {
    /// Check if nothing changed.
    pub fn is_noop(&self) -> bool {
        self.health_change == 0
            && self.score_change == 0
            && self.items_gained.is_empty()
            && self.items_removed.is_empty()
    }

    fn merge(&mut self, other: EffectOutcome) {
        self.health_change += other.health_change;
        self.score_change += other.score_change;
        self.items_gained.extend(other.items_gained);
        self.items_removed.extend(other.items_removed);
        if other.damage_rolled.is_some() {
            self.damage_rolled = other.damage_rolled;
        }
    }
}

impl Effect {
    /// Create a stat-delta effect from key/delta pairs.
    pub fn stat_delta<K: Into<String>>(deltas: impl IntoIterator<Item = (K, i64)>) -> Self {
        Effect::StatDelta {
            deltas: deltas.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Apply this effect to the player.
    ///
    /// `rng` is only consulted by [`Effect::RandomDamage`].
    pub fn apply<R: Rng + ?Sized>(&self, player: &mut PlayerState, rng: &mut R) -> EffectOutcome {
        let mut outcome = EffectOutcome::default();

        match self {
            Effect::StatDelta { deltas } => {
                for (key, delta) in deltas {
                    match Stat::from_key(key) {
                        Some(Stat::Health) => {
                            outcome.health_change += player.adjust_health(*delta);
                        }
                        Some(Stat::Score) => {
                            player.adjust_score(*delta);
                            outcome.score_change += *delta;
                        }
                        None => {
                            tracing::debug!(stat = %key, "ignoring unknown stat key");
                        }
                    }
                }
            }
            Effect::ItemGain { item } => {
                if player.inventory.insert(item.clone()) {
                    outcome.items_gained.push(item.clone());
                }
            }
            Effect::ScoreGain { amount } => {
                player.adjust_score(*amount);
                outcome.score_change = *amount;
            }
            Effect::Damage { amount } => {
                outcome.health_change = player.adjust_health(-(*amount).max(0));
            }
            Effect::RandomDamage { upper_bound } => {
                let rolled = if *upper_bound > 0 {
                    rng.gen_range(0..*upper_bound)
                } else {
                    0
                };
                outcome.damage_rolled = Some(rolled);
                outcome.health_change = player.adjust_health(-rolled);
            }
        }

        outcome
    }

    /// Human-readable summary, e.g. `health -10, score +5`.
    pub fn describe(&self) -> String {
        match self {
            Effect::StatDelta { deltas } => deltas
                .iter()
                .map(|(key, delta)| format!("{} {}", key, signed(*delta)))
                .collect::<Vec<_>>()
                .join(", "),
            Effect::ItemGain { item } => format!("gained {}", item),
            Effect::ScoreGain { amount } => format!("score {}", signed(*amount)),
            Effect::Damage { amount } => format!("health -{}", amount),
            Effect::RandomDamage { upper_bound } => format!("up to {} damage", upper_bound),
        }
    }
}

fn signed(value: i64) -> String {
    if value > 0 {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}

/// Apply every facet of a choice in canonical order: stat deltas, then `adds`,
/// then `removes`.
pub fn apply_choice<R: Rng + ?Sized>(
    choice: &Choice,
    player: &mut PlayerState,
    rng: &mut R,
) -> EffectOutcome {
    let mut outcome = EffectOutcome::default();

    if let Some(effect) = &choice.effect {
        outcome.merge(effect.apply(player, rng));
    }

    for item in &choice.adds {
        if player.inventory.insert(item.clone()) {
            outcome.items_gained.push(item.clone());
        }
    }

    for item in &choice.removes {
        if player.inventory.remove(item) {
            outcome.items_removed.push(item.clone());
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut player = PlayerState::new();
        let outcome = Effect::Damage { amount: 150 }.apply(&mut player, &mut rng());

        assert_eq!(player.health(), 0);
        assert_eq!(outcome.health_change, -100);
    }

    #[test]
    fn test_damage_sequences_never_go_negative() {
        let mut player = PlayerState::new();
        let mut rng = rng();

        for i in 0..200 {
            let effect = if i % 2 == 0 {
                Effect::Damage { amount: i % 17 }
            } else {
                Effect::RandomDamage { upper_bound: 40 }
            };
            effect.apply(&mut player, &mut rng);
            assert!(player.health() >= 0);
        }
        assert_eq!(player.health(), 0);
    }

    #[test]
    fn test_random_damage_range() {
        let mut rng = rng();
        for _ in 0..500 {
            let mut player = PlayerState::new();
            let outcome = Effect::RandomDamage { upper_bound: 10 }.apply(&mut player, &mut rng);
            let rolled = outcome.damage_rolled.unwrap();
            assert!((0..10).contains(&rolled));
            assert_eq!(player.health(), 100 - rolled);
        }
    }

    #[test]
    fn test_random_damage_zero_bound() {
        let mut player = PlayerState::new();
        let outcome = Effect::RandomDamage { upper_bound: 0 }.apply(&mut player, &mut rng());
        assert_eq!(outcome.damage_rolled, Some(0));
        assert_eq!(player.health(), 100);
    }

    #[test]
    fn test_item_gain_is_idempotent() {
        let mut player = PlayerState::new();
        let effect = Effect::ItemGain {
            item: "lantern".to_string(),
        };

        let first = effect.apply(&mut player, &mut rng());
        let second = effect.apply(&mut player, &mut rng());

        assert_eq!(first.items_gained, vec!["lantern".to_string()]);
        assert!(second.is_noop());
        assert_eq!(player.inventory.as_slice(), ["lantern"]);
    }

    #[test]
    fn test_stat_delta_ignores_unknown_keys() {
        let mut player = PlayerState::new();
        let effect = Effect::stat_delta([("health", -10), ("score", 5), ("luck", 3)]);

        let outcome = effect.apply(&mut player, &mut rng());

        assert_eq!(player.health(), 90);
        assert_eq!(player.score, 5);
        assert_eq!(outcome.health_change, -10);
        assert_eq!(outcome.score_change, 5);
    }

    #[test]
    fn test_score_is_signed() {
        let mut player = PlayerState::new();
        Effect::ScoreGain { amount: -12 }.apply(&mut player, &mut rng());
        assert_eq!(player.score, -12);
    }

    #[test]
    fn test_describe() {
        let effect = Effect::stat_delta([("score", 5), ("health", -10)]);
        assert_eq!(effect.describe(), "score +5, health -10");
        assert_eq!(Effect::ScoreGain { amount: 3 }.describe(), "score +3");
        assert_eq!(Effect::Damage { amount: 4 }.describe(), "health -4");
    }

    #[test]
    fn test_apply_choice_canonical_order() {
        let mut player = PlayerState::new();
        player.inventory.insert("coin");

        // The same item in adds and removes ends up removed.
        let choice = Choice {
            text: "trade".to_string(),
            next_scene: None,
            requires: vec![],
            effect: Some(Effect::stat_delta([("score", 2)])),
            adds: vec!["gem".to_string(), "coin".to_string()],
            removes: vec!["coin".to_string(), "gem".to_string()],
        };

        let outcome = apply_choice(&choice, &mut player, &mut rng());

        assert_eq!(player.score, 2);
        assert!(player.inventory.is_empty());
        assert_eq!(outcome.items_gained, vec!["gem".to_string()]);
        assert_eq!(
            outcome.items_removed,
            vec!["coin".to_string(), "gem".to_string()]
        );
    }
}
