//! Presentation read model.
//!
//! `BoardView` is what a UI needs to draw one frame: each tile's face, the
//! win banner and the label for the reset control. Its `Display` impl draws
//! the board as text, one row per grid line:
//!
//! ```text
//!  ?  [2]  ?
//!  1  [2]  ?
//!  ?   ?
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{GameState, Phase, TileId};

/// What one tile shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileFace {
    FaceDown,
    /// Selected, awaiting evaluation.
    FaceUp(u32),
    /// Part of a found pair.
    Matched(u32),
}

impl TileFace {
    #[must_use]
    pub fn is_face_up(&self) -> bool {
        !matches!(self, TileFace::FaceDown)
    }
}

/// One tile as rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    pub id: TileId,
    pub face: TileFace,
}

/// Render-ready board snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    /// Dimension of the dealt board, `None` while idle.
    pub grid_size: Option<u32>,
    /// Tiles in deal order (row-major).
    pub tiles: Vec<TileView>,
    pub phase: Phase,
    pub won: bool,
    pub moves: u32,
}

impl BoardView {
    /// Build the view of `state`.
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        let tiles = state
            .deck()
            .map(|deck| {
                deck.tiles()
                    .map(|tile| {
                        let face = if state.is_matched(tile.id) {
                            TileFace::Matched(tile.value)
                        } else if state.is_selected(tile.id) {
                            TileFace::FaceUp(tile.value)
                        } else {
                            TileFace::FaceDown
                        };
                        TileView { id: tile.id, face }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            grid_size: state.grid_size(),
            tiles,
            phase: state.phase(),
            won: state.is_won(),
            moves: state.moves(),
        }
    }

    /// Win banner text, shown once every pair is found.
    #[must_use]
    pub fn banner(&self) -> Option<&'static str> {
        self.won.then_some("You won!")
    }

    /// Label of the reset control.
    #[must_use]
    pub fn reset_label(&self) -> &'static str {
        if self.won {
            "Play Again"
        } else {
            "Reset"
        }
    }

    /// Rows of tiles, `grid_size` per row. The last row of an odd board is short.
    pub fn rows(&self) -> impl Iterator<Item = &[TileView]> {
        let width = self.grid_size.unwrap_or(1).max(1) as usize;
        self.tiles.chunks(width)
    }
}

impl fmt::Display for TileFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileFace::FaceDown => write!(f, "{:^4}", "?"),
            TileFace::FaceUp(value) => write!(f, "{:^4}", value),
            TileFace::Matched(value) => write!(f, "{:^4}", format!("[{value}]")),
        }
    }
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|tile| tile.face.to_string()).collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        if let Some(banner) = self.banner() {
            writeln!(f, "{banner}")?;
        }
        Ok(())
    }
}
