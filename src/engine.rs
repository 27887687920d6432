//! Game engine facade.
//!
//! `GameEngine` owns the rules and the one `GameState` of a session and
//! exposes the operations a presentation layer calls:
//!
//! - [`GameEngine::set_grid_size`] when the grid-size control changes
//! - [`GameEngine::reset`] for the reset / "Play Again" control
//! - [`GameEngine::on_tile_click`] for each tile click
//! - [`GameEngine::advance`] every frame (or timer tick) with the elapsed time
//!
//! ```
//! use std::time::Duration;
//! use memory_pairs::{GameEngine, MemoryConfig, Phase, TileId};
//!
//! let mut engine = GameEngine::new(MemoryConfig::default().with_seed(42)).unwrap();
//! assert_eq!(engine.state().phase(), Phase::Ready);
//!
//! engine.on_tile_click(TileId(0));
//! assert_eq!(engine.state().selection(), &[TileId(0)]);
//!
//! // Out-of-range sizes are ignored.
//! assert!(engine.set_grid_size(42).is_ignored());
//! assert_eq!(engine.state().grid_size(), Some(2));
//!
//! engine.advance(Duration::from_millis(16));
//! ```

use std::time::Duration;

use crate::core::{Action, ConfigError, GameState, MemoryConfig, TileId};
use crate::games::memory::MemoryGame;
use crate::rules::{GameResult, RulesEngine, Transition};
use crate::snapshot::{GameSnapshot, SnapshotError};
use crate::view::BoardView;

/// A playable memory game session.
#[derive(Clone, Debug)]
pub struct GameEngine {
    rules: MemoryGame,
    state: GameState,
}

impl GameEngine {
    /// Create an engine, dealing `config.default_grid_size` if set.
    pub fn new(config: MemoryConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let default_grid_size = config.default_grid_size;
        let rules = MemoryGame::new(config);
        let state = rules.new_state();
        let mut engine = Self { rules, state };

        if let Some(size) = default_grid_size {
            engine.set_grid_size(size);
        }
        Ok(engine)
    }

    /// Restore an engine from a snapshot.
    pub fn from_snapshot(snapshot: GameSnapshot) -> Result<Self, SnapshotError> {
        snapshot.validate()?;
        let (config, state) = snapshot.into_state();
        Ok(Self {
            rules: MemoryGame::new(config),
            state,
        })
    }

    /// Capture the session.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self.rules.config(), &self.state)
    }

    #[must_use]
    pub fn config(&self) -> &MemoryConfig {
        self.rules.config()
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Apply any engine input.
    pub fn apply(&mut self, action: Action) -> Transition {
        self.rules.apply_action(&mut self.state, &action)
    }

    /// Deal a new game of `grid_size`. Out-of-range sizes are ignored.
    pub fn initialize(&mut self, grid_size: u32) -> Transition {
        self.apply(Action::Initialize(grid_size))
    }

    /// The grid-size control changed.
    pub fn set_grid_size(&mut self, grid_size: u32) -> Transition {
        self.apply(Action::SetGridSize(grid_size))
    }

    /// Redeal at the requested grid size.
    pub fn reset(&mut self) -> Transition {
        self.apply(Action::Reset)
    }

    /// The player clicked tile `id`.
    pub fn on_tile_click(&mut self, id: TileId) -> Transition {
        self.apply(Action::Flip(id))
    }

    /// Move the clock forward, firing any due reveal.
    pub fn advance(&mut self, elapsed: Duration) -> Transition {
        let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.apply(Action::Advance { millis })
    }

    /// Clicks that would currently change the game.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<Action> {
        self.rules.legal_actions(&self.state)
    }

    /// `Some` once the game is won.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.rules.is_terminal(&self.state)
    }

    /// Render-ready view of the board.
    #[must_use]
    pub fn view(&self) -> BoardView {
        BoardView::from_state(&self.state)
    }
}
