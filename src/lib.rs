//! # memory-pairs
//!
//! A single-player memory-matching game engine: a square grid of face-down
//! tiles hides pairs of numbers, the player turns two at a time, and equal
//! pairs stay face-up until the whole board is cleared.
//!
//! ## Design Principles
//!
//! 1. **Presentation-Agnostic**: The engine never draws anything. Hosts feed
//!    it clicks and elapsed time and read back a `BoardView`.
//!
//! 2. **Deterministic**: Deals come from a seeded ChaCha RNG and the reveal
//!    delay runs on a logical clock, so a game replays exactly from its seed
//!    and inputs.
//!
//! 3. **Cancellable Timing**: The mismatch reveal is a scheduled task with a
//!    handle. A new deal cancels it, and a stale task can never touch a
//!    newer board.
//!
//! ## Architecture
//!
//! - **Rules / State Split**: `MemoryGame` implements `RulesEngine` and is
//!   stateless; all mutable data lives in `GameState`.
//!
//! - **Persistent Data Structures**: Deck and matched set use `im-rs`, so
//!   cloning a state for look-ahead or snapshots is cheap.
//!
//! ## Modules
//!
//! - `core`: Tiles, decks, state, actions, RNG, configuration
//! - `timer`: Logical-clock scheduler for deferred transitions
//! - `rules`: RulesEngine trait and transition outcomes
//! - `games`: The memory game rules
//! - `engine`: Facade a presentation layer drives
//! - `view`: Render-ready board model
//! - `snapshot`: Checkpoint and restore

pub mod core;
pub mod timer;
pub mod rules;
pub mod games;
pub mod engine;
pub mod view;
pub mod snapshot;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    Tile, TileId, Deck,
    GameRng, GameRngState,
    ConfigError, MemoryConfig, ReclickPolicy,
    Action, ActionRecord,
    GameState, Phase, Selection,
};

pub use crate::timer::{ScheduledTask, Scheduler, TimerHandle};

pub use crate::rules::{GameResult, IgnoreReason, RulesEngine, Transition};

pub use crate::games::memory::MemoryGame;

pub use crate::engine::GameEngine;

pub use crate::view::{BoardView, TileFace, TileView};

pub use crate::snapshot::{GameSnapshot, SnapshotError};
