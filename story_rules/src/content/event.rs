//! Random events: overlays that interrupt the story between scenes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::scene::{present, stat_delta_from_value, whole_number};
use super::ContentLoadError;
use crate::effects::Effect;

/// Result text shown when an event option defines none.
pub const DEFAULT_EVENT_RESULT: &str = "You continue your journey.";

/// Label of the single affordance offered by an event without options.
pub const CONTINUE_LABEL: &str = "Continue";

/// A probabilistic interruption with its own text and options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomEvent {
    pub id: String,
    pub text: String,
    pub choices: Vec<EventChoice>,
}

/// One way of resolving a random event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventChoice {
    pub text: String,
    pub effect: Option<Effect>,
    pub result: Option<String>,
}

impl EventChoice {
    /// The implicit option of an event that defines none.
    pub fn continue_option() -> Self {
        Self {
            text: CONTINUE_LABEL.to_string(),
            effect: None,
            result: None,
        }
    }

    /// Result text, falling back to the default.
    pub fn result_text(&self) -> &str {
        self.result.as_deref().unwrap_or(DEFAULT_EVENT_RESULT)
    }
}

impl RandomEvent {
    /// Labels of the affordances to offer, one per option or a single "Continue".
    pub fn option_labels(&self) -> Vec<String> {
        if self.choices.is_empty() {
            vec![CONTINUE_LABEL.to_string()]
        } else {
            self.choices.iter().map(|c| c.text.clone()).collect()
        }
    }

    /// Look up the option at `index`, honoring the implicit "Continue".
    pub fn option(&self, index: usize) -> Option<EventChoice> {
        if self.choices.is_empty() {
            (index == 0).then(EventChoice::continue_option)
        } else {
            self.choices.get(index).cloned()
        }
    }
}

/// Parse an event pool document: `{ "events": [ ... ] }`.
pub fn parse_event_pool(doc: &Value) -> Result<Vec<RandomEvent>, ContentLoadError> {
    let events = doc
        .get("events")
        .and_then(Value::as_array)
        .ok_or(ContentLoadError::InvalidEventPool)?;

    events
        .iter()
        .enumerate()
        .map(|(position, raw)| parse_event(position, raw))
        .collect()
}

fn parse_event(position: usize, raw: &Value) -> Result<RandomEvent, ContentLoadError> {
    let invalid = |reason: &str| ContentLoadError::InvalidEvent {
        event: position.to_string(),
        reason: reason.to_string(),
    };

    let obj = raw.as_object().ok_or_else(|| invalid("not an object"))?;
    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("id must be a string"))?;

    let invalid = |reason: String| ContentLoadError::InvalidEvent {
        event: id.to_string(),
        reason,
    };

    let text = obj
        .get("text")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("text must be a string".to_string()))?;

    let raw_options = match present(obj, "options").or_else(|| present(obj, "choices")) {
        None => Vec::new(),
        Some(Value::Array(options)) => options.clone(),
        Some(_) => return Err(invalid("options must be an array".to_string())),
    };

    let choices = raw_options
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            parse_event_choice(raw).map_err(|r| invalid(format!("option[{}]: {}", index, r)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RandomEvent {
        id: id.to_string(),
        text: text.to_string(),
        choices,
    })
}

fn parse_event_choice(raw: &Value) -> Result<EventChoice, String> {
    let obj = raw.as_object().ok_or("not an object")?;

    let text = obj
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or(CONTINUE_LABEL)
        .to_string();

    let result = obj
        .get("result")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(EventChoice {
        text,
        effect: parse_event_effect(obj)?,
        result,
    })
}

/// Read an event option effect: a tag string with `value`/`item`, or a
/// `{stat: number}` object.
fn parse_event_effect(obj: &Map<String, Value>) -> Result<Option<Effect>, String> {
    let value = || match present(obj, "value") {
        None => Ok(0),
        Some(raw) => whole_number(raw).ok_or_else(|| "value must be a whole number".to_string()),
    };

    match present(obj, "effect") {
        None => Ok(None),
        Some(Value::String(tag)) => match tag.as_str() {
            "gain_item" => {
                let item = obj
                    .get("item")
                    .and_then(Value::as_str)
                    .ok_or("gain_item requires a string item")?;
                Ok(Some(Effect::ItemGain {
                    item: item.to_string(),
                }))
            }
            "gain_score" => Ok(Some(Effect::ScoreGain { amount: value()? })),
            "damage" => Ok(Some(Effect::Damage { amount: value()? })),
            "random_damage" => Ok(Some(Effect::RandomDamage {
                upper_bound: value()?,
            })),
            "none" => Ok(None),
            other => {
                tracing::debug!(tag = %other, "unknown event effect tag, treating as no effect");
                Ok(None)
            }
        },
        Some(delta @ Value::Object(_)) => stat_delta_from_value(delta)
            .map(Some)
            .ok_or_else(|| "effect must map stat keys to whole numbers".to_string()),
        Some(_) => Err("effect must be a tag string or a stat object".to_string()),
    }
}
