//! Deck construction.
//!
//! A deck for a `grid_size` board holds `pair_count = floor(grid_size² / 2)`
//! values, each dealt twice, shuffled uniformly. Ids are assigned in deal
//! order. When `grid_size²` is odd the deck is one tile short of the grid
//! and the last cell stays empty.
//!
//! Decks are immutable once dealt. Starting a new game deals a new deck with
//! a higher `epoch`; tile ids of different epochs never refer to each other.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::rng::GameRng;
use super::tile::{Tile, TileId};

/// Number of grid cells for a `grid_size` board.
#[must_use]
pub const fn total_cells(grid_size: u32) -> usize {
    (grid_size as usize) * (grid_size as usize)
}

/// Number of distinct values dealt for a `grid_size` board.
#[must_use]
pub const fn pair_count(grid_size: u32) -> usize {
    total_cells(grid_size) / 2
}

/// The tiles of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    epoch: u64,
    grid_size: u32,
    tiles: Vector<Tile>,
}

impl Deck {
    /// Deal a shuffled deck for a `grid_size` board.
    ///
    /// ```
    /// use memory_pairs::core::{Deck, GameRng};
    ///
    /// let mut rng = GameRng::new(42);
    /// let deck = Deck::deal(3, 1, &mut rng);
    ///
    /// assert_eq!(deck.len(), 8); // 9 cells, 4 pairs
    /// assert!(deck.is_fully_paired());
    /// ```
    #[must_use]
    pub fn deal(grid_size: u32, epoch: u64, rng: &mut GameRng) -> Self {
        let cells = total_cells(grid_size);
        let pairs = pair_count(grid_size) as u32;

        let mut values: Vec<u32> = (1..=pairs).chain(1..=pairs).collect();
        rng.shuffle(&mut values);
        // Never shortens: 2 * floor(cells / 2) <= cells.
        values.truncate(cells);

        Self::from_values(grid_size, epoch, values)
    }

    /// Build a deck from values in deal order.
    ///
    /// No pairing checks are made; see [`Deck::is_fully_paired`].
    #[must_use]
    pub fn from_values(grid_size: u32, epoch: u64, values: impl IntoIterator<Item = u32>) -> Self {
        let tiles = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| Tile::new(TileId(i as u32), value))
            .collect();

        Self {
            epoch,
            grid_size,
            tiles,
        }
    }

    /// Deal sequence number.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Board dimension this deck was dealt for.
    #[must_use]
    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Get a tile by ID.
    #[must_use]
    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    /// Get a tile's value.
    #[must_use]
    pub fn value_of(&self, id: TileId) -> Option<u32> {
        self.get(id).map(|tile| tile.value)
    }

    #[must_use]
    pub fn contains(&self, id: TileId) -> bool {
        id.index() < self.tiles.len()
    }

    /// Iterate tiles in deal order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Iterate tile IDs in deal order.
    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().map(|tile| tile.id)
    }

    /// Count how often each value occurs.
    #[must_use]
    pub fn value_counts(&self) -> FxHashMap<u32, usize> {
        let mut counts = FxHashMap::default();
        for tile in &self.tiles {
            *counts.entry(tile.value).or_insert(0) += 1;
        }
        counts
    }

    /// Check that every value `1..=pair_count` occurs exactly twice
    /// and that ids match deal positions.
    #[must_use]
    pub fn is_fully_paired(&self) -> bool {
        let pairs = pair_count(self.grid_size);
        if self.tiles.len() != pairs * 2 {
            return false;
        }
        if self.tiles.iter().enumerate().any(|(i, t)| t.id.index() != i) {
            return false;
        }

        let counts = self.value_counts();
        counts.len() == pairs
            && counts
                .iter()
                .all(|(&value, &count)| count == 2 && (1..=pairs as u32).contains(&value))
    }
}
