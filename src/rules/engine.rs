//! Rules engine trait for game implementations.
//!
//! Games implement `RulesEngine` to define their rules:
//! - What actions are legal
//! - How actions modify state
//! - Win conditions

use serde::{Deserialize, Serialize};

use crate::core::action::Action;
use crate::core::config::MemoryConfig;
use crate::core::state::GameState;
use crate::core::tile::TileId;

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Every pair found.
    Won {
        /// Evaluated pairs it took.
        moves: u32,
    },
}

/// Why an action changed nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// Grid size outside the configured bounds.
    InvalidGridSize(u32),
    /// Reset before any grid size was requested.
    NoGridSize,
    /// No deck has been dealt.
    NoDeck,
    /// Two tiles are face-up awaiting evaluation.
    InputLocked,
    /// The game is over.
    GameWon,
    /// The id is not part of the current deck.
    UnknownTile(TileId),
    /// The tile already belongs to a found pair.
    AlreadyMatched(TileId),
}

/// What applying an action did.
///
/// Hosts can use this to drive effects (sounds, animations); tests use it
/// to assert transitions without diffing states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// Nothing changed.
    Ignored(IgnoreReason),

    /// A new deck was dealt.
    Dealt {
        grid_size: u32,
        epoch: u64,
        tiles: usize,
    },

    /// The first tile of a pair was turned face-up.
    Flipped(TileId),

    /// The lone face-up tile was clicked again and turned back.
    Deselected {
        tile: TileId,
        /// Matched tiles forgotten as a penalty.
        cleared_matches: usize,
    },

    /// Two tiles with equal values were found.
    Matched {
        first: TileId,
        second: TileId,
        won: bool,
    },

    /// Two tiles differ; they stay face-up until `hide_at_ms`.
    Mismatched {
        first: TileId,
        second: TileId,
        hide_at_ms: u64,
    },

    /// Time passed. `hidden` is the mismatched pair turned back, if any.
    Advanced {
        now_ms: u64,
        hidden: Option<(TileId, TileId)>,
    },
}

impl Transition {
    /// Check if the action changed nothing.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, Transition::Ignored(_))
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_actions`: player inputs that would not be ignored
/// - `apply_action`: must be total; invalid input yields `Transition::Ignored`
/// - `is_terminal`: return None while the game continues
pub trait RulesEngine {
    /// Get the game configuration.
    fn config(&self) -> &MemoryConfig;

    /// Player actions that would change the state.
    ///
    /// Returns empty if the player cannot act.
    fn legal_actions(&self, state: &GameState) -> Vec<Action>;

    /// Apply an action to the game state.
    ///
    /// Must be deterministic given the state's RNG.
    fn apply_action(&self, state: &mut GameState, action: &Action) -> Transition;

    /// Check if the game is over.
    fn is_terminal(&self, state: &GameState) -> Option<GameResult>;

    // === Convenience Methods ===

    /// Check if an action is legal for the player.
    fn is_legal(&self, state: &GameState, action: &Action) -> bool {
        self.legal_actions(state).contains(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ignored() {
        assert!(Transition::Ignored(IgnoreReason::NoDeck).is_ignored());
        assert!(!Transition::Flipped(TileId(0)).is_ignored());
    }

    #[test]
    fn test_transition_serialization() {
        let transition = Transition::Mismatched {
            first: TileId(1),
            second: TileId(2),
            hide_at_ms: 1000,
        };
        let json = serde_json::to_string(&transition).unwrap();
        let deserialized: Transition = serde_json::from_str(&json).unwrap();
        assert_eq!(transition, deserialized);
    }
}
