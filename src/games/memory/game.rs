//! Memory game rules.

use tracing::{debug, info, trace};

use crate::core::{
    Action, ActionRecord, Deck, GameRng, GameState, MemoryConfig, ReclickPolicy, Selection, TileId,
};
use crate::rules::{GameResult, IgnoreReason, RulesEngine, Transition};
use crate::timer::ScheduledTask;
use std::time::Duration;

/// Rules of the pairs game, bound to a configuration.
#[derive(Clone, Debug)]
pub struct MemoryGame {
    config: MemoryConfig,
}

impl MemoryGame {
    /// Create the rules for `config`.
    ///
    /// The config is expected to be validated by the caller.
    #[must_use]
    pub fn new(config: MemoryConfig) -> Self {
        Self { config }
    }

    /// Create an idle state seeded per the configuration.
    #[must_use]
    pub fn new_state(&self) -> GameState {
        let rng = match self.config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        GameState::new(rng)
    }

    /// Deal a new game of `grid_size`.
    ///
    /// Sizes outside the configured bounds are ignored and leave the
    /// current game untouched.
    fn initialize(&self, state: &mut GameState, grid_size: u32) -> Transition {
        if !self.config.accepts_grid_size(grid_size) {
            debug!(grid_size, "ignoring out-of-range grid size");
            return Transition::Ignored(IgnoreReason::InvalidGridSize(grid_size));
        }

        // A reveal scheduled against the old deck must never fire on the new one.
        if let Some(handle) = state.pending_reveal() {
            state.scheduler.cancel(handle);
        }

        let epoch = state.alloc_epoch();
        let deck = Deck::deal(grid_size, epoch, &mut state.rng);
        let tiles = deck.len();

        state.set_requested_grid_size(grid_size);
        state.install_deck(deck);

        info!(grid_size, epoch, tiles, "dealt new game");
        Transition::Dealt {
            grid_size,
            epoch,
            tiles,
        }
    }

    fn reset(&self, state: &mut GameState) -> Transition {
        match state.requested_grid_size() {
            Some(size) => self.initialize(state, size),
            None => Transition::Ignored(IgnoreReason::NoGridSize),
        }
    }

    fn flip(&self, state: &mut GameState, id: TileId) -> Transition {
        if let Some(reason) = self.reject_flip(state, id) {
            trace!(%id, ?reason, "click ignored");
            return Transition::Ignored(reason);
        }

        let current = Selection::from_slice(state.selection());
        match current.as_slice() {
            [] => {
                state.push_selection(id);
                Transition::Flipped(id)
            }
            &[only] if only == id => self.deselect(state, id),
            &[first] => {
                state.set_input_locked(true);
                state.push_selection(id);
                self.evaluate(state, first, id)
            }
            // Two face-up tiles always hold the input lock.
            _ => Transition::Ignored(IgnoreReason::InputLocked),
        }
    }

    /// First reason a click on `id` must be ignored, if any.
    fn reject_flip(&self, state: &GameState, id: TileId) -> Option<IgnoreReason> {
        let deck = match state.deck() {
            Some(deck) => deck,
            None => return Some(IgnoreReason::NoDeck),
        };
        if state.input_locked() {
            return Some(IgnoreReason::InputLocked);
        }
        if state.is_won() {
            return Some(IgnoreReason::GameWon);
        }
        if !deck.contains(id) {
            return Some(IgnoreReason::UnknownTile(id));
        }
        if state.is_matched(id) {
            return Some(IgnoreReason::AlreadyMatched(id));
        }
        None
    }

    fn deselect(&self, state: &mut GameState, id: TileId) -> Transition {
        state.clear_selection();

        let cleared_matches = match self.config.reclick_policy {
            ReclickPolicy::ClearProgress => {
                let cleared = state.matched().len();
                state.clear_matched();
                cleared
            }
            ReclickPolicy::Deselect => 0,
        };

        if cleared_matches > 0 {
            info!(%id, cleared_matches, "re-click cleared progress");
        }
        Transition::Deselected {
            tile: id,
            cleared_matches,
        }
    }

    /// Compare the two face-up tiles.
    fn evaluate(&self, state: &mut GameState, first: TileId, second: TileId) -> Transition {
        state.count_move();

        let (epoch, is_pair) = match state.deck() {
            Some(deck) => {
                let is_pair = match (deck.get(first), deck.get(second)) {
                    (Some(a), Some(b)) => a.pairs_with(b),
                    _ => false,
                };
                (deck.epoch(), is_pair)
            }
            None => return Transition::Ignored(IgnoreReason::NoDeck),
        };

        if is_pair {
            state.add_matched(first, second);
            state.clear_selection();
            state.set_input_locked(false);

            let won = state.update_won();
            if won {
                info!(moves = state.moves(), "all pairs found");
            } else {
                debug!(%first, %second, "pair matched");
            }
            return Transition::Matched { first, second, won };
        }

        let handle = state.scheduler.schedule(
            self.config.reveal_delay(),
            ScheduledTask::HideMismatch {
                epoch,
                first,
                second,
            },
        );
        state.set_pending_reveal(Some(handle));
        let hide_at_ms = state.scheduler.deadline(handle).unwrap_or_else(|| state.now_ms());

        debug!(%first, %second, hide_at_ms, "pair mismatched");
        Transition::Mismatched {
            first,
            second,
            hide_at_ms,
        }
    }

    fn advance(&self, state: &mut GameState, elapsed: Duration) -> Transition {
        let mut hidden = None;

        for (handle, task) in state.scheduler.advance(elapsed) {
            match task {
                ScheduledTask::HideMismatch {
                    epoch,
                    first,
                    second,
                } => {
                    let current_epoch = state.deck().map(Deck::epoch);
                    if current_epoch != Some(epoch) || state.pending_reveal() != Some(handle) {
                        trace!(%handle, epoch, "stale reveal dropped");
                        continue;
                    }
                    state.clear_selection();
                    state.set_input_locked(false);
                    state.set_pending_reveal(None);
                    hidden = Some((first, second));
                    debug!(%first, %second, "mismatched pair hidden");
                }
            }
        }

        Transition::Advanced {
            now_ms: state.now_ms(),
            hidden,
        }
    }

    /// Whether a transition belongs in the game's history.
    fn is_recorded(transition: &Transition) -> bool {
        match transition {
            Transition::Ignored(_) => false,
            Transition::Advanced { hidden, .. } => hidden.is_some(),
            _ => true,
        }
    }
}

impl RulesEngine for MemoryGame {
    fn config(&self) -> &MemoryConfig {
        &self.config
    }

    fn legal_actions(&self, state: &GameState) -> Vec<Action> {
        let deck = match state.deck() {
            Some(deck) if !state.input_locked() && !state.is_won() => deck,
            _ => return vec![],
        };

        // Unmatched tiles, including the lone face-up one (re-click).
        deck.ids()
            .filter(|&id| !state.is_matched(id))
            .map(Action::Flip)
            .collect()
    }

    fn apply_action(&self, state: &mut GameState, action: &Action) -> Transition {
        let transition = match *action {
            Action::Initialize(size) => self.initialize(state, size),
            Action::SetGridSize(size) => {
                state.set_requested_grid_size(size);
                self.initialize(state, size)
            }
            Action::Reset => self.reset(state),
            Action::Flip(id) => self.flip(state, id),
            Action::Advance { millis } => self.advance(state, Duration::from_millis(millis)),
        };

        if Self::is_recorded(&transition) {
            let epoch = state.deck().map(Deck::epoch).unwrap_or(0);
            let record = ActionRecord::new(*action, epoch, state.now_ms(), 0);
            state.record_action(record, self.config.history_limit);
        }

        debug!(?action, ?transition, "applied action");
        transition
    }

    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        state.is_won().then(|| GameResult::Won {
            moves: state.moves(),
        })
    }
}
