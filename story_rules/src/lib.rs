//! # Story Rules
//!
//! The rules crate for the narrative engine - holds the content model (scenes,
//! choices, random events), the effect interpreter, and the player record.
//! This crate owns no session state and makes no sequencing decisions; that is
//! the job of `narrative_core`.

pub mod content;
pub mod effects;
pub mod player;

pub use content::*;
pub use effects::*;
pub use player::*;
