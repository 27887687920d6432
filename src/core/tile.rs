//! Tile identification.
//!
//! Every tile in a deck has a `TileId` assigned in deal order:
//! the first tile is `TileId(0)`, the last is `TileId(len - 1)`.
//!
//! Ids are scoped to a single deck. A new deal starts a new id space,
//! distinguished by the deck's epoch (see [`crate::core::Deck`]).
//!
//! ```
//! use memory_pairs::core::{Tile, TileId};
//!
//! let tile = Tile::new(TileId::new(3), 7);
//! assert_eq!(tile.id.index(), 3);
//! assert_eq!(tile.value, 7);
//! ```

use serde::{Deserialize, Serialize};

/// Identifier of a tile within one deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl TileId {
    /// Create a new tile ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Position of this tile in the deck.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for TileId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Ids from hosts with signed integers; negative or oversized values fail.
impl TryFrom<i64> for TileId {
    type Error = std::num::TryFromIntError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        u32::try_from(id).map(Self)
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile({})", self.0)
    }
}

/// One face-down card on the board.
///
/// `value` is in `1..=pair_count` and appears on exactly two tiles of a deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub value: u32,
}

impl Tile {
    #[must_use]
    pub const fn new(id: TileId, value: u32) -> Self {
        Self { id, value }
    }

    /// Check whether two tiles form a pair.
    ///
    /// A tile never pairs with itself.
    #[must_use]
    pub fn pairs_with(&self, other: &Tile) -> bool {
        self.id != other.id && self.value == other.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_id_index() {
        assert_eq!(TileId::new(0).index(), 0);
        assert_eq!(TileId::new(17).index(), 17);
        assert_eq!(TileId::from(5).raw(), 5);
    }

    #[test]
    fn test_tile_id_from_signed() {
        assert_eq!(TileId::try_from(7i64), Ok(TileId(7)));
        assert!(TileId::try_from(-1i64).is_err());
        assert!(TileId::try_from(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_tile_id_ordering() {
        assert!(TileId(1) < TileId(2));
        assert_eq!(TileId(4).max(TileId(3)), TileId(4));
    }

    #[test]
    fn test_pairs_with() {
        let a = Tile::new(TileId(0), 3);
        let b = Tile::new(TileId(5), 3);
        let c = Tile::new(TileId(6), 4);

        assert!(a.pairs_with(&b));
        assert!(b.pairs_with(&a));
        assert!(!a.pairs_with(&c));
        assert!(!a.pairs_with(&a));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", TileId(42)), "Tile(42)");
    }

    #[test]
    fn test_serialization() {
        let tile = Tile::new(TileId(9), 2);
        let json = serde_json::to_string(&tile).unwrap();
        let deserialized: Tile = serde_json::from_str(&json).unwrap();
        assert_eq!(tile, deserialized);
    }
}
