//! Checkpoint and restore of a running game.
//!
//! A `GameSnapshot` captures an engine completely: configuration, deck,
//! selection, matched tiles, the pending reveal and the RNG position. The
//! restored engine continues exactly where the original left off, including
//! future deals.
//!
//! Snapshots are encoded with `bincode`. Decoding checks the snapshot is a
//! reachable game state before handing it to the rules.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::state::StateParts;
use crate::core::{
    ActionRecord, ConfigError, Deck, GameRng, GameRngState, GameState, MemoryConfig, TileId,
};
use crate::timer::{ScheduledTask, Scheduler, TimerHandle};

/// Snapshot decoding or validation failure.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Decode(#[from] bincode::Error),

    #[error("snapshot config is invalid: {0}")]
    Config(#[from] ConfigError),

    #[error("deck is not a complete set of pairs")]
    BrokenDeck,

    #[error("deck epoch {epoch} is not below next epoch {next}")]
    EpochOutOfOrder { epoch: u64, next: u64 },

    #[error("tile {0} is not part of the deck")]
    UnknownTile(TileId),

    #[error("selection holds {0} tiles")]
    SelectionTooLarge(usize),

    #[error("tile {0} is both selected and matched")]
    SelectedAndMatched(TileId),

    #[error("tile {0} is listed twice")]
    DuplicateTile(TileId),

    #[error("matched tiles do not form pairs")]
    UnpairedMatch,

    #[error("tiles are face-up without a deck")]
    StrayTiles,

    #[error("won flag disagrees with matched tiles")]
    WonMismatch,

    #[error("input lock disagrees with the selection")]
    LockMismatch,

    #[error("pending reveal {0} is not scheduled")]
    MissingReveal(TimerHandle),

    #[error("pending reveal {0} was scheduled for another deck")]
    StaleReveal(TimerHandle),

    #[error("pending reveal {0} hides tiles other than the selection")]
    RevealMismatch(TimerHandle),

    #[error("scheduler queue is out of order")]
    BrokenScheduler,
}

/// Serializable image of an engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub config: MemoryConfig,
    pub deck: Option<Deck>,
    pub requested_grid_size: Option<u32>,
    pub selection: Vec<TileId>,
    pub matched: Vec<TileId>,
    pub input_locked: bool,
    pub won: bool,
    pub moves: u32,
    pub pending_reveal: Option<TimerHandle>,
    pub next_epoch: u64,
    pub scheduler: Scheduler,
    pub rng: GameRngState,
    pub history: Vec<ActionRecord>,
    pub action_sequence: u32,
}

impl GameSnapshot {
    /// Capture `state` played under `config`.
    #[must_use]
    pub fn capture(config: &MemoryConfig, state: &GameState) -> Self {
        let parts = state.clone().into_parts();
        Self {
            config: config.clone(),
            deck: parts.deck,
            requested_grid_size: parts.requested_grid_size,
            selection: parts.selection,
            matched: parts.matched,
            input_locked: parts.input_locked,
            won: parts.won,
            moves: parts.moves,
            pending_reveal: parts.pending_reveal,
            next_epoch: parts.next_epoch,
            scheduler: parts.scheduler,
            rng: parts.rng.state(),
            history: parts.history,
            action_sequence: parts.action_sequence,
        }
    }

    /// Encode to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode and validate.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check that the snapshot describes a reachable game.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        self.config.validate()?;
        if !self.scheduler.is_consistent() {
            return Err(SnapshotError::BrokenScheduler);
        }

        let Some(deck) = &self.deck else {
            return if self.selection.is_empty()
                && self.matched.is_empty()
                && !self.won
                && !self.input_locked
                && self.pending_reveal.is_none()
            {
                Ok(())
            } else {
                Err(SnapshotError::StrayTiles)
            };
        };

        if !deck.is_fully_paired() {
            return Err(SnapshotError::BrokenDeck);
        }
        if deck.epoch() >= self.next_epoch {
            return Err(SnapshotError::EpochOutOfOrder {
                epoch: deck.epoch(),
                next: self.next_epoch,
            });
        }

        if let Some(&id) = self
            .selection
            .iter()
            .chain(&self.matched)
            .find(|id| !deck.contains(**id))
        {
            return Err(SnapshotError::UnknownTile(id));
        }
        if self.selection.len() > 2 {
            return Err(SnapshotError::SelectionTooLarge(self.selection.len()));
        }
        if let Some(&id) = self.selection.iter().find(|id| self.matched.contains(id)) {
            return Err(SnapshotError::SelectedAndMatched(id));
        }

        let mut seen = rustc_hash::FxHashSet::default();
        if let Some(&id) = self.matched.iter().find(|&&id| !seen.insert(id)) {
            return Err(SnapshotError::DuplicateTile(id));
        }

        // Matched tiles come in complete pairs.
        let mut matched_values: Vec<u32> = self
            .matched
            .iter()
            .filter_map(|&id| deck.value_of(id))
            .collect();
        matched_values.sort_unstable();
        if matched_values.len() % 2 != 0
            || matched_values.chunks(2).any(|pair| pair[0] != pair[1])
        {
            return Err(SnapshotError::UnpairedMatch);
        }

        let all_matched = !deck.is_empty() && self.matched.len() == deck.len();
        if self.won != all_matched {
            return Err(SnapshotError::WonMismatch);
        }

        if self.input_locked != (self.selection.len() == 2)
            || self.input_locked != self.pending_reveal.is_some()
        {
            return Err(SnapshotError::LockMismatch);
        }
        if let Some(handle) = self.pending_reveal {
            match self.scheduler.task(handle) {
                None => return Err(SnapshotError::MissingReveal(handle)),
                Some(ScheduledTask::HideMismatch {
                    epoch,
                    first,
                    second,
                }) => {
                    if epoch != deck.epoch() {
                        return Err(SnapshotError::StaleReveal(handle));
                    }
                    if self.selection != [first, second] {
                        return Err(SnapshotError::RevealMismatch(handle));
                    }
                }
            }
        }

        Ok(())
    }

    /// Rebuild the state. The snapshot must be valid.
    pub(crate) fn into_state(self) -> (MemoryConfig, GameState) {
        let state = GameState::from_parts(StateParts {
            deck: self.deck,
            requested_grid_size: self.requested_grid_size,
            selection: self.selection,
            matched: self.matched,
            input_locked: self.input_locked,
            won: self.won,
            moves: self.moves,
            pending_reveal: self.pending_reveal,
            next_epoch: self.next_epoch,
            scheduler: self.scheduler,
            rng: GameRng::from_state(&self.rng),
            history: self.history,
            action_sequence: self.action_sequence,
        });
        (self.config, state)
    }
}
