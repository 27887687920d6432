//! Engine bindings for Python.

use std::time::Duration;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyBytes;

use crate::core::{MemoryConfig, Phase, ReclickPolicy, TileId, DEFAULT_REVEAL_DELAY_MS};
use crate::engine::GameEngine;
use crate::snapshot::GameSnapshot;
use crate::view::TileFace;

/// Python wrapper for GameEngine.
///
/// Tiles are addressed by their integer id, row-major from 0.
#[pyclass(name = "GameEngine")]
pub struct PyGameEngine {
    inner: GameEngine,
}

#[pymethods]
impl PyGameEngine {
    /// Create an engine and deal the first board.
    ///
    /// # Arguments
    /// - grid_size: Board dimension, or None to start idle
    /// - seed: RNG seed for reproducible deals (entropy if None)
    /// - reveal_delay_ms: How long a mismatched pair stays visible
    /// - deselect_on_reclick: Re-clicking a selected tile only turns it back
    ///   instead of clearing found pairs
    #[new]
    #[pyo3(signature = (
        grid_size = Some(2),
        seed = None,
        reveal_delay_ms = DEFAULT_REVEAL_DELAY_MS,
        deselect_on_reclick = false
    ))]
    fn new(
        grid_size: Option<u32>,
        seed: Option<u64>,
        reveal_delay_ms: u64,
        deselect_on_reclick: bool,
    ) -> PyResult<Self> {
        let mut config = MemoryConfig::default()
            .with_default_grid_size(grid_size)
            .with_reveal_delay_ms(reveal_delay_ms);
        if let Some(seed) = seed {
            config = config.with_seed(seed);
        }
        if deselect_on_reclick {
            config = config.with_reclick_policy(ReclickPolicy::Deselect);
        }

        let inner = GameEngine::new(config).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Restore an engine from `snapshot()` bytes.
    #[staticmethod]
    fn from_snapshot(data: &[u8]) -> PyResult<Self> {
        let snapshot =
            GameSnapshot::from_bytes(data).map_err(|e| PyValueError::new_err(e.to_string()))?;
        let inner =
            GameEngine::from_snapshot(snapshot).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Encode the session.
    fn snapshot<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyBytes>> {
        let bytes = self
            .inner
            .snapshot()
            .to_bytes()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(PyBytes::new_bound(py, &bytes))
    }

    /// Deal a new board. Returns False if the size is out of range.
    fn initialize(&mut self, grid_size: i64) -> bool {
        match u32::try_from(grid_size) {
            Ok(size) => !self.inner.initialize(size).is_ignored(),
            Err(_) => false,
        }
    }

    /// Change the grid-size control. Returns False if ignored.
    fn set_grid_size(&mut self, grid_size: i64) -> bool {
        match u32::try_from(grid_size) {
            Ok(size) => !self.inner.set_grid_size(size).is_ignored(),
            Err(_) => false,
        }
    }

    /// Redeal at the requested size.
    fn reset(&mut self) -> bool {
        !self.inner.reset().is_ignored()
    }

    /// Click tile `tile`. Returns False if the click was ignored.
    fn click(&mut self, tile: i64) -> bool {
        match TileId::try_from(tile) {
            Ok(id) => !self.inner.on_tile_click(id).is_ignored(),
            Err(_) => false,
        }
    }

    /// Move the clock forward by `millis`.
    fn advance(&mut self, millis: u64) {
        self.inner.advance(Duration::from_millis(millis));
    }

    /// Ids of tiles that can currently be clicked.
    fn legal_tiles(&self) -> Vec<u32> {
        self.inner
            .legal_actions()
            .iter()
            .filter_map(|action| action.tile())
            .map(TileId::raw)
            .collect()
    }

    #[getter]
    fn grid_size(&self) -> Option<u32> {
        self.inner.state().grid_size()
    }

    /// Face-up tile ids awaiting evaluation.
    #[getter]
    fn selection(&self) -> Vec<u32> {
        self.inner.state().selection().iter().map(|id| id.raw()).collect()
    }

    #[getter]
    fn matched(&self) -> Vec<u32> {
        self.inner.state().matched().iter().map(|id| id.raw()).collect()
    }

    #[getter]
    fn won(&self) -> bool {
        self.inner.state().is_won()
    }

    #[getter]
    fn locked(&self) -> bool {
        self.inner.state().input_locked()
    }

    #[getter]
    fn moves(&self) -> u32 {
        self.inner.state().moves()
    }

    /// One of "idle", "ready", "one_flipped", "evaluating", "won".
    #[getter]
    fn phase(&self) -> &'static str {
        match self.inner.state().phase() {
            Phase::Idle => "idle",
            Phase::Ready => "ready",
            Phase::OneFlipped => "one_flipped",
            Phase::Evaluating => "evaluating",
            Phase::Won => "won",
        }
    }

    /// Visible value per tile, None where face-down.
    fn faces(&self) -> Vec<Option<u32>> {
        self.inner
            .view()
            .tiles
            .iter()
            .map(|tile| match tile.face {
                TileFace::FaceDown => None,
                TileFace::FaceUp(value) | TileFace::Matched(value) => Some(value),
            })
            .collect()
    }

    /// Board drawn as text.
    fn board(&self) -> String {
        self.inner.view().to_string()
    }

    fn __repr__(&self) -> String {
        let state = self.inner.state();
        format!(
            "GameEngine(grid_size={:?}, matched={}, moves={}, phase={})",
            state.grid_size(),
            state.matched().len(),
            state.moves(),
            self.phase()
        )
    }
}
