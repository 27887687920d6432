//! Inputs to the engine.
//!
//! Everything that can change a game is an `Action`: the player's clicks,
//! the host's grid-size control and reset button, and the passage of time.
//! Driving the engine purely through actions keeps every transition
//! replayable from a seed plus the action list.

use serde::{Deserialize, Serialize};

use super::tile::TileId;

/// A single engine input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Deal a new game of the given dimension.
    Initialize(u32),

    /// The grid-size control changed. The value is remembered even when it
    /// cannot be dealt, so a later reset uses what the control shows.
    SetGridSize(u32),

    /// Reset / "Play Again": redeal at the requested grid size.
    Reset,

    /// The player clicked a tile.
    Flip(TileId),

    /// Host clock moved forward.
    Advance {
        /// Elapsed milliseconds since the last advance.
        millis: u64,
    },
}

impl Action {
    /// Check if this action came from the player rather than the host.
    #[must_use]
    pub fn is_player_input(&self) -> bool {
        matches!(self, Action::Flip(_))
    }

    /// Tile targeted by this action, if any.
    #[must_use]
    pub fn tile(&self) -> Option<TileId> {
        match self {
            Action::Flip(id) => Some(*id),
            _ => None,
        }
    }
}

/// A recorded action with metadata for history tracking.
///
/// Used for replay, debugging and move review.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The action taken.
    pub action: Action,

    /// Deck epoch the action applied to.
    pub epoch: u64,

    /// Logical clock (ms) when the action was applied.
    pub at_ms: u64,

    /// Sequence number within the game (for ordering).
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(action: Action, epoch: u64, at_ms: u64, sequence: u32) -> Self {
        Self {
            action,
            epoch,
            at_ms,
            sequence,
        }
    }
}
