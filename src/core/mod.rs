//! Core engine types: tiles, decks, state, actions, RNG, configuration.
//!
//! Everything here is plain data plus the invariants that keep it
//! consistent. Game rules live in [`crate::games::memory`].

pub mod tile;
pub mod deck;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;

pub use tile::{Tile, TileId};
pub use deck::{pair_count, total_cells, Deck};
pub use rng::{GameRng, GameRngState};
pub use config::{
    ConfigError, MemoryConfig, ReclickPolicy, DEFAULT_REVEAL_DELAY_MS, MAX_GRID_SIZE, MIN_GRID_SIZE,
};
pub use action::{Action, ActionRecord};
pub use state::{GameState, Phase, Selection};
