//! # Narrative Core
//!
//! The session engine of the branching story system. This crate drives a
//! player through the scene graph loaded by `story_rules`, interleaves random
//! event overlays, and keeps a single save slot current.
//!
//! ## Core Components
//!
//! - **session**: The narrative state machine and its render payloads
//! - **scheduler**: Bernoulli interrupt trial over the event pool
//! - **persistence**: Save record schema and the single save slot
//! - **collaborators**: Optional display and audio hooks
//! - **config**: TOML engine settings
//!
//! ## Design Philosophy
//!
//! - **Validate before mutate**: A transition to a malformed scene is rejected before any state changes
//! - **Caller-driven**: The session reacts to choices; it never runs its own loop
//! - **Fail soft on storage**: Save failures are logged, never surfaced as gameplay errors

pub mod collaborators;
pub mod config;
pub mod error;
pub mod persistence;
pub mod scheduler;
pub mod session;

pub use collaborators::*;
pub use config::*;
pub use error::*;
pub use persistence::*;
pub use scheduler::*;
pub use session::*;
