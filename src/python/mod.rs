//! Python bindings for the memory-pairs engine.
//!
//! Lets a Python host (a notebook, a pygame front end, a test harness)
//! drive the engine without reimplementing any rules.
//!
//! # Quick Start
//!
//! ```python
//! import memory_pairs as mp
//!
//! game = mp.GameEngine(grid_size=4, seed=42)
//! game.click(0)
//! game.click(1)
//! game.advance(1000)
//! print(game.board())
//! ```

use pyo3::prelude::*;

mod py_engine;

pub use py_engine::*;

/// memory-pairs: a memory-matching game engine.
#[pymodule]
fn memory_pairs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyGameEngine>()?;
    m.add("MIN_GRID_SIZE", crate::core::MIN_GRID_SIZE)?;
    m.add("MAX_GRID_SIZE", crate::core::MAX_GRID_SIZE)?;
    Ok(())
}
