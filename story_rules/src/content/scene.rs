//! Scenes, choices, and the render-time validation predicate.

use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::effects::{Effect, Stat};
use crate::player::Inventory;

/// A narrative node: display text plus ordered choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    pub text: String,
    pub choices: Vec<Choice>,
}

/// A selectable transition out of a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    /// Destination scene. `None` keeps the player on the current scene.
    pub next_scene: Option<String>,
    /// Items that must all be held for the choice to be offered.
    pub requires: Vec<String>,
    /// Always the stat-delta form for scene choices.
    pub effect: Option<Effect>,
    pub adds: Vec<String>,
    pub removes: Vec<String>,
}

impl Choice {
    /// Check if the choice's requirements are met by the inventory.
    pub fn is_presentable(&self, inventory: &Inventory) -> bool {
        inventory.satisfies(&self.requires)
    }
}

impl Scene {
    /// Choices whose requirements are met, paired with their index in the scene.
    pub fn presentable_choices<'a>(
        &'a self,
        inventory: &'a Inventory,
    ) -> impl Iterator<Item = (usize, &'a Choice)> + 'a {
        self.choices
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.is_presentable(inventory))
    }

    /// Check if no choice can be offered with this inventory.
    pub fn is_terminal_for(&self, inventory: &Inventory) -> bool {
        self.presentable_choices(inventory).next().is_none()
    }
}

/// Why a raw scene document was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("scene is missing")]
    Missing,

    #[error("scene must be an object")]
    NotAnObject,

    #[error("scene text must be a string")]
    TextNotString,

    #[error("scene choices must be an array")]
    ChoicesNotArray,

    #[error("choice[{index}] is not an object")]
    ChoiceNotObject { index: usize },

    #[error("choice[{index}].text must be a string")]
    ChoiceTextNotString { index: usize },

    #[error("choice[{index}].nextScene must be a string")]
    NextSceneNotString { index: usize },

    #[error("choice[{index}].{field} must be an array of strings")]
    InvalidItemList { index: usize, field: &'static str },

    #[error("choice[{index}].effect must map stat keys to whole numbers")]
    InvalidEffect { index: usize },
}

/// A scene that failed validation at render time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid scene '{scene_id}': {failure}")]
pub struct SceneValidationError {
    pub scene_id: String,
    pub failure: ValidationFailure,
}

/// Validation predicate over a raw scene document.
///
/// Returns `None` for a well-formed scene.
pub fn validate(raw: &Value) -> Option<ValidationFailure> {
    parse_scene("", raw).err()
}

/// Validate a raw scene document and convert it into a [`Scene`].
pub fn parse_scene(id: &str, raw: &Value) -> Result<Scene, ValidationFailure> {
    let obj = raw.as_object().ok_or(ValidationFailure::NotAnObject)?;

    let text = obj
        .get("text")
        .and_then(Value::as_str)
        .ok_or(ValidationFailure::TextNotString)?;

    let raw_choices = obj
        .get("choices")
        .and_then(Value::as_array)
        .ok_or(ValidationFailure::ChoicesNotArray)?;

    let choices = raw_choices
        .iter()
        .enumerate()
        .map(|(index, raw)| parse_choice(index, raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Scene {
        id: id.to_string(),
        text: text.to_string(),
        choices,
    })
}

fn parse_choice(index: usize, raw: &Value) -> Result<Choice, ValidationFailure> {
    let obj = raw
        .as_object()
        .ok_or(ValidationFailure::ChoiceNotObject { index })?;

    let text = obj
        .get("text")
        .and_then(Value::as_str)
        .ok_or(ValidationFailure::ChoiceTextNotString { index })?;

    let next_scene = match present(obj, "nextScene") {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err(ValidationFailure::NextSceneNotString { index }),
    };

    let effect = match present(obj, "effect") {
        None => None,
        Some(value) => Some(
            stat_delta_from_value(value).ok_or(ValidationFailure::InvalidEffect { index })?,
        ),
    };

    Ok(Choice {
        text: text.to_string(),
        next_scene,
        requires: item_list(obj, index, "requires")?,
        effect,
        adds: item_list(obj, index, "adds")?,
        removes: item_list(obj, index, "removes")?,
    })
}

/// Look up an optional field, treating JSON `null` as absent.
pub(crate) fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn item_list(
    obj: &Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<Vec<String>, ValidationFailure> {
    let Some(value) = present(obj, field) else {
        return Ok(Vec::new());
    };

    value
        .as_array()
        .and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .ok_or(ValidationFailure::InvalidItemList { index, field })
}

/// Read a `{stat: number}` object as a stat-delta effect, in authored order.
///
/// Unknown stat keys are dropped whatever their value. Known keys need a
/// whole number; `10.0` reads as `10`.
pub(crate) fn stat_delta_from_value(value: &Value) -> Option<Effect> {
    let mut deltas = IndexMap::new();
    for (key, delta) in value.as_object()? {
        if Stat::from_key(key).is_none() {
            tracing::debug!(stat = %key, "dropping unknown stat key");
            continue;
        }
        deltas.insert(key.clone(), whole_number(delta)?);
    }
    Some(Effect::StatDelta { deltas })
}

/// Read a JSON number with no fractional part as an integer.
pub(crate) fn whole_number(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}
