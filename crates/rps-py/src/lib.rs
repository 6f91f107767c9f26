//! # RPS Python Bindings
//!
//! PyO3 bindings exposing the rock-paper-scissors session to Python.
//!
//! ## Usage
//!
//! ```python
//! from rps import Session, Kind
//!
//! session = Session(width=800.0, height=600.0, spawn_count=5, seed=42)
//! session.on_win(lambda kind: print(f"{kind} wins!"))
//! session.start()
//!
//! for _ in range(600):
//!     report = session.frame(1 / 60)
//!
//! xy = session.positions().reshape(-1, 2)   # numpy, float32
//! kinds = session.kinds()                   # numpy, uint8 (0/1/2)
//! print(session.counts())
//! ```

use std::time::Duration;

use glam::Vec2;
use numpy::{PyArray1, ToPyArray};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use rps_core::{
    Census, Kind, PairMode, ParameterError, Selected, SessionConfig, SessionController,
    SessionError,
};

// =============================================================================
// Value types
// =============================================================================

/// Entity kind for Python.
///
/// The integer value matches the codes returned by `Session.kinds()`.
#[pyclass(name = "Kind", eq, eq_int, hash, frozen)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PyKind {
    Rock = 0,
    Paper = 1,
    Scissors = 2,
}

#[pymethods]
impl PyKind {
    fn __str__(&self) -> &'static str {
        Kind::from(*self).name()
    }
}

impl From<Kind> for PyKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Rock => PyKind::Rock,
            Kind::Paper => PyKind::Paper,
            Kind::Scissors => PyKind::Scissors,
        }
    }
}

impl From<PyKind> for Kind {
    fn from(kind: PyKind) -> Self {
        match kind {
            PyKind::Rock => Kind::Rock,
            PyKind::Paper => Kind::Paper,
            PyKind::Scissors => Kind::Scissors,
        }
    }
}

/// Per-kind population counts.
#[pyclass(name = "Census", frozen)]
#[derive(Clone)]
pub struct PyCensus {
    /// Rock count.
    #[pyo3(get)]
    pub rock: usize,
    /// Paper count.
    #[pyo3(get)]
    pub paper: usize,
    /// Scissors count.
    #[pyo3(get)]
    pub scissors: usize,
}

impl From<Census> for PyCensus {
    fn from(c: Census) -> Self {
        Self {
            rock: c.rock,
            paper: c.paper,
            scissors: c.scissors,
        }
    }
}

#[pymethods]
impl PyCensus {
    /// Sum over all kinds.
    #[getter]
    fn total(&self) -> usize {
        self.rock + self.paper + self.scissors
    }

    fn __repr__(&self) -> String {
        format!(
            "Census(rock={}, paper={}, scissors={})",
            self.rock, self.paper, self.scissors
        )
    }
}

/// Display data for the selected entity.
#[pyclass(name = "Selected", frozen)]
#[derive(Clone)]
pub struct PySelected {
    /// Entity ID.
    #[pyo3(get)]
    pub id: u64,
    /// Current kind.
    #[pyo3(get)]
    pub kind: PyKind,
    /// Kinds held so far, e.g. "Rock -> Paper".
    #[pyo3(get)]
    pub path: String,
    /// Velocity magnitude.
    #[pyo3(get)]
    pub speed: f32,
}

impl From<Selected> for PySelected {
    fn from(s: Selected) -> Self {
        Self {
            id: s.id.as_u64(),
            kind: s.kind.into(),
            path: s.path,
            speed: s.speed,
        }
    }
}

#[pymethods]
impl PySelected {
    fn __repr__(&self) -> String {
        format!(
            "Selected(id={}, path='{}', speed={:.2})",
            self.id, self.path, self.speed
        )
    }
}

/// Result of one `Session.frame` call.
#[pyclass(name = "FrameReport", frozen)]
#[derive(Clone)]
pub struct PyFrameReport {
    /// True if a tick ran.
    #[pyo3(get)]
    pub ticked: bool,
    /// Winner found by this frame's win check, if any.
    #[pyo3(get)]
    pub winner: Option<PyKind>,
    /// Contacts resolved by the tick.
    #[pyo3(get)]
    pub contacts: usize,
    /// Conversions caused by the tick.
    #[pyo3(get)]
    pub conversions: usize,
}

#[pymethods]
impl PyFrameReport {
    fn __repr__(&self) -> String {
        format!(
            "FrameReport(ticked={}, winner={:?}, contacts={}, conversions={})",
            self.ticked, self.winner, self.contacts, self.conversions
        )
    }
}

// =============================================================================
// Session
// =============================================================================

/// A rock-paper-scissors session.
#[pyclass(name = "Session", unsendable)]
pub struct PySession {
    inner: SessionController,
}

#[pymethods]
impl PySession {
    /// Create an idle session.
    #[new]
    #[pyo3(signature = (width=800.0, height=600.0, spawn_count=3, seed=0, speed=1.0, pair_mode="ordered_pairs"))]
    fn new(
        width: f32,
        height: f32,
        spawn_count: usize,
        seed: u64,
        speed: f32,
        pair_mode: &str,
    ) -> PyResult<Self> {
        let config = SessionConfig::with_bounds(width, height)
            .with_spawn_count(spawn_count)
            .with_seed(seed)
            .with_speed(speed)
            .with_pair_mode(parse_pair_mode(pair_mode)?);
        Self::from_config(config)
    }

    /// Create an idle session from a JSON config. Missing fields take
    /// their defaults.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config: SessionConfig =
            serde_json::from_str(json).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Self::from_config(config)
    }

    /// Spawn a fresh population and pause.
    fn reset(&mut self) -> PyResult<()> {
        self.inner.reset().map_err(session_err)
    }

    /// Start ticking; resets first if never reset.
    fn start(&mut self) -> PyResult<()> {
        self.inner.start().map_err(session_err)
    }

    /// Stop ticking.
    fn stop(&mut self) {
        self.inner.stop();
    }

    /// Advance by one host frame of `dt` seconds.
    ///
    /// Releases the GIL while the tick runs.
    fn frame(&mut self, py: Python<'_>, dt: f64) -> PyResult<PyFrameReport> {
        let elapsed = Duration::try_from_secs_f64(dt)
            .map_err(|e| PyValueError::new_err(format!("invalid dt {dt}: {e}")))?;
        let report = py
            .allow_threads(|| self.inner.frame(elapsed))
            .map_err(session_err)?;

        Ok(PyFrameReport {
            ticked: report.ticked(),
            winner: report.winner.map(PyKind::from),
            contacts: report.tick.as_ref().map_or(0, |t| t.contacts),
            conversions: report.tick.as_ref().map_or(0, |t| t.conversions()),
        })
    }

    /// Register a callable invoked with the winning `Kind`.
    fn on_win(&mut self, callback: Py<PyAny>) {
        self.inner.on_win(move |kind| {
            Python::with_gil(|py| {
                if let Err(err) = callback.call1(py, (PyKind::from(kind),)) {
                    err.print(py);
                }
            });
        });
    }

    /// Set the speed multiplier (> 0).
    fn set_speed(&mut self, speed: f32) -> PyResult<()> {
        self.inner.set_speed(speed).map_err(param_err)
    }

    /// Set the per-kind population for the next reset (>= 1).
    fn set_spawn_count(&mut self, count: usize) -> PyResult<()> {
        self.inner.set_spawn_count(count).map_err(param_err)
    }

    /// Zoom in one level. Returns False at the top level.
    fn zoom_in(&mut self) -> bool {
        self.inner.zoom_in()
    }

    /// Zoom out one level. Returns False at the bottom level.
    fn zoom_out(&mut self) -> bool {
        self.inner.zoom_out()
    }

    /// Select the first entity within `tolerance` of (x, y).
    fn select_nearest(&mut self, x: f32, y: f32, tolerance: f32) -> Option<u64> {
        self.inner
            .select_nearest(Vec2::new(x, y), tolerance)
            .map(|id| id.as_u64())
    }

    /// Select as for a click at (x, y).
    fn select_at(&mut self, x: f32, y: f32) -> Option<u64> {
        self.inner.select_at(Vec2::new(x, y)).map(|id| id.as_u64())
    }

    /// Drop the selection.
    fn clear_selection(&mut self) {
        self.inner.clear_selection();
    }

    /// Counts from the latest tick.
    fn counts(&self) -> PyCensus {
        self.inner.counts().into()
    }

    /// The selected entity, if any.
    fn selected(&self) -> Option<PySelected> {
        self.inner.selected().map(PySelected::from)
    }

    /// Positions as a flat float32 array [x0, y0, x1, y1, ...].
    fn positions<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f32>> {
        let flat: Vec<f32> = self
            .inner
            .entities()
            .iter()
            .flat_map(|e| [e.position.x, e.position.y])
            .collect();
        flat.to_pyarray(py)
    }

    /// Velocities as a flat float32 array [vx0, vy0, vx1, vy1, ...].
    fn velocities<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f32>> {
        let flat: Vec<f32> = self
            .inner
            .entities()
            .iter()
            .flat_map(|e| [e.velocity.x, e.velocity.y])
            .collect();
        flat.to_pyarray(py)
    }

    /// Kind codes as a uint8 array (0 = Rock, 1 = Paper, 2 = Scissors).
    fn kinds<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<u8>> {
        let codes: Vec<u8> = self
            .inner
            .entities()
            .iter()
            .map(|e| e.kind() as u8)
            .collect();
        codes.to_pyarray(py)
    }

    /// True unless running.
    #[getter]
    fn is_paused(&self) -> bool {
        self.inner.is_paused()
    }

    /// "idle", "running" or "paused".
    #[getter]
    fn state(&self) -> &'static str {
        match self.inner.state() {
            rps_core::SessionState::Idle => "idle",
            rps_core::SessionState::Running => "running",
            rps_core::SessionState::Paused => "paused",
        }
    }

    /// Ticks run so far.
    #[getter]
    fn tick(&self) -> u64 {
        self.inner.tick_count()
    }

    /// Spawner seed.
    #[getter]
    fn seed(&self) -> u64 {
        self.inner.seed()
    }

    /// Current zoom scale.
    #[getter]
    fn scale(&self) -> f32 {
        self.inner.scale()
    }

    /// Current zoom level index.
    #[getter]
    fn zoom_level(&self) -> usize {
        self.inner.zoom_level()
    }

    fn __len__(&self) -> usize {
        self.inner.entities().len()
    }

    fn __repr__(&self) -> String {
        format!(
            "Session(state={}, tick={}, counts={})",
            self.state(),
            self.inner.tick_count(),
            self.inner.counts()
        )
    }
}

impl PySession {
    fn from_config(config: SessionConfig) -> PyResult<Self> {
        let inner = SessionController::new(config).map_err(session_err)?;
        Ok(Self { inner })
    }
}

fn parse_pair_mode(name: &str) -> PyResult<PairMode> {
    match name.to_lowercase().as_str() {
        "ordered_pairs" | "ordered" => Ok(PairMode::OrderedPairs),
        "unordered_pairs" | "unordered" => Ok(PairMode::UnorderedPairs),
        other => Err(PyValueError::new_err(format!("unknown pair mode: {other}"))),
    }
}

fn session_err(err: SessionError) -> PyErr {
    match err {
        SessionError::Config(e) => PyValueError::new_err(e.to_string()),
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

fn param_err(err: ParameterError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Python module definition.
#[pymodule]
fn _rps(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySession>()?;
    m.add_class::<PyKind>()?;
    m.add_class::<PyCensus>()?;
    m.add_class::<PySelected>()?;
    m.add_class::<PyFrameReport>()?;
    Ok(())
}
