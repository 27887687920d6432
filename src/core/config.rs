//! Engine configuration.
//!
//! `MemoryConfig` carries every tunable of the game:
//! - Accepted grid sizes (`min_grid_size..=max_grid_size`)
//! - The grid size dealt on construction
//! - How long a mismatched pair stays face-up
//! - What re-clicking the lone flipped tile does
//! - RNG seed (fixed for reproducible deals, `None` for entropy)
//!
//! ```
//! use memory_pairs::core::{MemoryConfig, ReclickPolicy};
//!
//! let config = MemoryConfig::default()
//!     .with_seed(7)
//!     .with_reveal_delay_ms(250)
//!     .with_reclick_policy(ReclickPolicy::Deselect);
//!
//! assert!(config.validate().is_ok());
//! assert!(config.accepts_grid_size(4));
//! assert!(!config.accepts_grid_size(11));
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Smallest board that still holds a pair.
pub const MIN_GRID_SIZE: u32 = 2;

/// Largest board accepted by default.
pub const MAX_GRID_SIZE: u32 = 10;

/// How long a mismatched pair stays visible by default.
pub const DEFAULT_REVEAL_DELAY_MS: u64 = 1000;

/// What happens when the player clicks the only face-up tile again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReclickPolicy {
    /// Flip the tile back and forget every matched pair.
    #[default]
    ClearProgress,
    /// Flip the tile back, keep matched pairs.
    Deselect,
}

/// Invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("minimum grid size {0} is below {min}", min = MIN_GRID_SIZE)]
    GridTooSmall(u32),

    #[error("grid size bounds are inverted: min {min} > max {max}")]
    InvertedBounds { min: u32, max: u32 },

    #[error("maximum grid size {0} overflows the tile id space")]
    GridTooLarge(u32),

    #[error("default grid size {size} is outside {min}..={max}")]
    DefaultOutOfBounds { size: u32, min: u32, max: u32 },
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Smallest accepted grid dimension.
    pub min_grid_size: u32,

    /// Largest accepted grid dimension.
    pub max_grid_size: u32,

    /// Grid dealt when the engine is created. `None` starts idle.
    pub default_grid_size: Option<u32>,

    /// Delay before a mismatched pair is flipped back.
    pub reveal_delay_ms: u64,

    /// Behavior of clicking the lone flipped tile.
    pub reclick_policy: ReclickPolicy,

    /// Fixed RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Maximum action records kept per game (0 = unlimited).
    pub history_limit: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            min_grid_size: MIN_GRID_SIZE,
            max_grid_size: MAX_GRID_SIZE,
            default_grid_size: Some(MIN_GRID_SIZE),
            reveal_delay_ms: DEFAULT_REVEAL_DELAY_MS,
            reclick_policy: ReclickPolicy::default(),
            seed: None,
            history_limit: 0,
        }
    }
}

impl MemoryConfig {
    /// Set a fixed RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the mismatch reveal delay in milliseconds.
    #[must_use]
    pub fn with_reveal_delay_ms(mut self, delay_ms: u64) -> Self {
        self.reveal_delay_ms = delay_ms;
        self
    }

    /// Set the re-click behavior.
    #[must_use]
    pub fn with_reclick_policy(mut self, policy: ReclickPolicy) -> Self {
        self.reclick_policy = policy;
        self
    }

    /// Set the grid dealt on construction (`None` to start idle).
    #[must_use]
    pub fn with_default_grid_size(mut self, size: Option<u32>) -> Self {
        self.default_grid_size = size;
        self
    }

    /// Set accepted grid bounds.
    #[must_use]
    pub fn with_grid_bounds(mut self, min: u32, max: u32) -> Self {
        self.min_grid_size = min;
        self.max_grid_size = max;
        self
    }

    /// Cap the action history per game.
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Reveal delay as a `Duration`.
    #[must_use]
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    /// Check whether `size` may be dealt.
    #[must_use]
    pub fn accepts_grid_size(&self, size: u32) -> bool {
        (self.min_grid_size..=self.max_grid_size).contains(&size)
    }

    /// Validate bounds and defaults.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_grid_size < MIN_GRID_SIZE {
            return Err(ConfigError::GridTooSmall(self.min_grid_size));
        }
        if self.min_grid_size > self.max_grid_size {
            return Err(ConfigError::InvertedBounds {
                min: self.min_grid_size,
                max: self.max_grid_size,
            });
        }
        if self.max_grid_size.checked_mul(self.max_grid_size).is_none() {
            return Err(ConfigError::GridTooLarge(self.max_grid_size));
        }
        if let Some(size) = self.default_grid_size {
            if !self.accepts_grid_size(size) {
                return Err(ConfigError::DefaultOutOfBounds {
                    size,
                    min: self.min_grid_size,
                    max: self.max_grid_size,
                });
            }
        }
        Ok(())
    }
}
