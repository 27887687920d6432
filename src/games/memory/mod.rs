//! The memory (pairs) game.
//!
//! A single player turns tiles two at a time looking for equal values:
//! - A board of `n x n` cells, `2 <= n <= 10` by default
//! - Every value is dealt on exactly two tiles
//! - Equal values stay face-up; different values flip back after a delay
//! - The game is won once every tile is matched

mod game;

pub use game::MemoryGame;
