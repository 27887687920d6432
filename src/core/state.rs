//! Game state.
//!
//! `GameState` is the single owner of everything that changes during play:
//! - The dealt deck (absent until a valid grid size is set)
//! - Face-up selection, matched set, input lock, won flag
//! - The pending mismatch reveal and the scheduler that will fire it
//! - RNG and per-game action history
//!
//! Only the rules (see [`crate::games::memory::MemoryGame`]) mutate it.
//! Readers use the accessors; the derived [`Phase`] names where the game
//! stands in its state machine.

use im::{OrdSet, Vector};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::action::ActionRecord;
use super::deck::Deck;
use super::rng::GameRng;
use super::tile::TileId;
use crate::timer::{Scheduler, TimerHandle};

/// Tiles face-up and awaiting evaluation. Never more than two.
pub type Selection = SmallVec<[TileId; 2]>;

/// Where a game stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No deck yet: no valid grid size has been set.
    Idle,
    /// Deck dealt, nothing face-up.
    Ready,
    /// One tile face-up, input open.
    OneFlipped,
    /// Two tiles face-up, input locked until hidden.
    Evaluating,
    /// Every tile matched. Terminal until the next deal.
    Won,
}

/// Full game state.
///
/// Uses `im` persistent collections so cloning a state (for look-ahead,
/// undo or snapshots) is O(1).
#[derive(Clone, Debug)]
pub struct GameState {
    deck: Option<Deck>,

    /// Value of the grid-size control, valid or not.
    requested_grid_size: Option<u32>,

    selection: Selection,
    matched: OrdSet<TileId>,
    input_locked: bool,
    won: bool,

    /// Evaluated pairs this game (matches and mismatches).
    moves: u32,

    /// Scheduled hide of the current mismatch.
    pending_reveal: Option<TimerHandle>,

    /// Epoch for the next deal.
    next_epoch: u64,

    /// Clock and deferred tasks.
    pub scheduler: Scheduler,

    /// RNG used for dealing.
    pub rng: GameRng,

    history: Vector<ActionRecord>,
    action_sequence: u32,
}

impl GameState {
    /// Create an idle state with no deck.
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self {
            deck: None,
            requested_grid_size: None,
            selection: Selection::new(),
            matched: OrdSet::new(),
            input_locked: false,
            won: false,
            moves: 0,
            pending_reveal: None,
            next_epoch: 1,
            scheduler: Scheduler::new(),
            rng,
            history: Vector::new(),
            action_sequence: 0,
        }
    }

    // === Read access ===

    #[must_use]
    pub fn deck(&self) -> Option<&Deck> {
        self.deck.as_ref()
    }

    /// Dimension of the dealt board.
    #[must_use]
    pub fn grid_size(&self) -> Option<u32> {
        self.deck.as_ref().map(Deck::grid_size)
    }

    /// Last value of the grid-size control.
    #[must_use]
    pub fn requested_grid_size(&self) -> Option<u32> {
        self.requested_grid_size
    }

    #[must_use]
    pub fn selection(&self) -> &[TileId] {
        &self.selection
    }

    #[must_use]
    pub fn matched(&self) -> &OrdSet<TileId> {
        &self.matched
    }

    #[must_use]
    pub fn is_selected(&self, id: TileId) -> bool {
        self.selection.contains(&id)
    }

    #[must_use]
    pub fn is_matched(&self, id: TileId) -> bool {
        self.matched.contains(&id)
    }

    /// Check if a tile shows its value (selected or matched).
    #[must_use]
    pub fn is_face_up(&self, id: TileId) -> bool {
        self.is_selected(id) || self.is_matched(id)
    }

    #[must_use]
    pub fn input_locked(&self) -> bool {
        self.input_locked
    }

    #[must_use]
    pub fn is_won(&self) -> bool {
        self.won
    }

    #[must_use]
    pub fn moves(&self) -> u32 {
        self.moves
    }

    #[must_use]
    pub fn pending_reveal(&self) -> Option<TimerHandle> {
        self.pending_reveal
    }

    /// Current logical time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Actions applied to the current game, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// Derive the state-machine phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.deck.is_none() {
            Phase::Idle
        } else if self.won {
            Phase::Won
        } else {
            match self.selection.len() {
                0 => Phase::Ready,
                1 => Phase::OneFlipped,
                _ => Phase::Evaluating,
            }
        }
    }

    // === Mutation (rules only) ===

    /// Take the next deal epoch.
    pub(crate) fn alloc_epoch(&mut self) -> u64 {
        let epoch = self.next_epoch;
        self.next_epoch += 1;
        epoch
    }

    pub(crate) fn set_requested_grid_size(&mut self, size: u32) {
        self.requested_grid_size = Some(size);
    }

    /// Replace the deck and clear all per-game state.
    ///
    /// Any pending reveal must already be cancelled.
    pub(crate) fn install_deck(&mut self, deck: Deck) {
        self.deck = Some(deck);
        self.selection.clear();
        self.matched = OrdSet::new();
        self.input_locked = false;
        self.won = false;
        self.moves = 0;
        self.pending_reveal = None;
        self.history = Vector::new();
        self.action_sequence = 0;
    }

    pub(crate) fn push_selection(&mut self, id: TileId) {
        debug_assert!(self.selection.len() < 2, "selection holds at most two tiles");
        self.selection.push(id);
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub(crate) fn clear_matched(&mut self) {
        self.matched = OrdSet::new();
    }

    pub(crate) fn add_matched(&mut self, first: TileId, second: TileId) {
        self.matched.insert(first);
        self.matched.insert(second);
    }

    pub(crate) fn set_input_locked(&mut self, locked: bool) {
        self.input_locked = locked;
    }

    pub(crate) fn count_move(&mut self) {
        self.moves += 1;
    }

    pub(crate) fn set_pending_reveal(&mut self, handle: Option<TimerHandle>) {
        self.pending_reveal = handle;
    }

    /// Set `won` if every tile of a non-empty deck is matched.
    ///
    /// Returns the new flag.
    pub(crate) fn update_won(&mut self) -> bool {
        if let Some(deck) = &self.deck {
            if !deck.is_empty() && self.matched.len() == deck.len() {
                self.won = true;
            }
        }
        self.won
    }

    /// Append to history, dropping the oldest record past `limit` (0 = unlimited).
    pub(crate) fn record_action(&mut self, mut record: ActionRecord, limit: usize) {
        record.sequence = self.action_sequence;
        self.action_sequence += 1;
        self.history.push_back(record);
        if limit > 0 {
            while self.history.len() > limit {
                self.history.pop_front();
            }
        }
    }

    // === Snapshot support ===

    pub(crate) fn into_parts(self) -> StateParts {
        StateParts {
            deck: self.deck,
            requested_grid_size: self.requested_grid_size,
            selection: self.selection.into_iter().collect(),
            matched: self.matched.into_iter().collect(),
            input_locked: self.input_locked,
            won: self.won,
            moves: self.moves,
            pending_reveal: self.pending_reveal,
            next_epoch: self.next_epoch,
            scheduler: self.scheduler,
            rng: self.rng,
            history: self.history.into_iter().collect(),
            action_sequence: self.action_sequence,
        }
    }

    pub(crate) fn from_parts(parts: StateParts) -> Self {
        Self {
            deck: parts.deck,
            requested_grid_size: parts.requested_grid_size,
            selection: parts.selection.into_iter().collect(),
            matched: parts.matched.into_iter().collect(),
            input_locked: parts.input_locked,
            won: parts.won,
            moves: parts.moves,
            pending_reveal: parts.pending_reveal,
            next_epoch: parts.next_epoch,
            scheduler: parts.scheduler,
            rng: parts.rng,
            history: parts.history.into_iter().collect(),
            action_sequence: parts.action_sequence,
        }
    }
}

/// Owned, plain-collection view of a `GameState`.
pub(crate) struct StateParts {
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
    pub rng: GameRng,
    pub history: Vec<ActionRecord>,
    pub action_sequence: u32,
}
