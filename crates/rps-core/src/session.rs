//! Session controller: the host-facing state machine.
//!
//! A [`SessionController`] owns one simulation, its spawner and the win-check
//! timer. Hosts drive it by calling [`SessionController::frame`] once per
//! rendered frame and issue commands between frames.
//!
//! # States
//!
//! ```text
//!            start()             stop()
//!   Idle ─────────────► Running ────────► Paused
//!     │                    ▲                 │
//!     │ reset()            └──── start() ────┘
//!     └───────────────────────────────────► Paused
//! ```
//!
//! `reset()` is valid from any state and always lands in `Paused`.
//!
//! # Win checks
//!
//! The win check runs on its own cadence of elapsed frame time, not once per
//! tick, and reads whatever counts the latest tick produced. A check that was
//! pending when the session stopped still fires once.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::census::Census;
use crate::config::{validate_speed, validate_spawn_count, SessionConfig};
use crate::entity::{Entity, EntityId, Kind};
use crate::error::{ParameterError, SessionError};
use crate::geometry::overlaps;
use crate::simulation::{Simulation, TickReport};
use crate::spawner::Spawner;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Created, never reset.
    Idle,
    /// Ticking every frame.
    Running,
    /// Ready; no ticks until started.
    Paused,
}

/// Display data for the selected entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selected {
    /// Entity ID
    pub id: EntityId,
    /// Current kind
    pub kind: Kind,
    /// Kinds held so far, e.g. `"Rock -> Paper"`
    pub path: String,
    /// Velocity magnitude
    pub speed: f32,
}

impl Selected {
    fn of(entity: &Entity) -> Self {
        Self {
            id: entity.id(),
            kind: entity.kind(),
            path: entity.path(),
            speed: entity.speed(),
        }
    }
}

impl fmt::Display for Selected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | Path: {} | Speed: {:.2}",
            self.kind, self.path, self.speed
        )
    }
}

/// Result of one [`SessionController::frame`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// The tick run this frame, if the session was running.
    pub tick: Option<TickReport>,
    /// Kind that won at this frame's win check. The session has already been
    /// reset when this is set.
    pub winner: Option<Kind>,
}

impl FrameReport {
    /// True if a tick ran.
    #[must_use]
    pub fn ticked(&self) -> bool {
        self.tick.is_some()
    }
}

/// Callback invoked with the winning kind.
pub type WinListener = Box<dyn FnMut(Kind) + Send>;

/// Owns and drives one rock-paper-scissors session.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use rps_core::config::SessionConfig;
/// use rps_core::session::{SessionController, SessionState};
///
/// let mut session = SessionController::new(SessionConfig::default().with_seed(1)).unwrap();
/// assert_eq!(session.state(), SessionState::Idle);
///
/// session.start().unwrap();
/// let report = session.frame(Duration::from_millis(16)).unwrap();
/// assert!(report.ticked());
/// assert_eq!(session.counts().total(), 9);
/// ```
pub struct SessionController {
    config: SessionConfig,
    simulation: Simulation,
    spawner: Spawner,
    state: SessionState,
    counts: Census,
    selected: Option<EntityId>,
    /// Frame time accumulated toward the next win check.
    win_elapsed: Duration,
    /// A check that was in flight when the session stopped.
    win_pending: bool,
    listeners: Vec<WinListener>,
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state)
            .field("counts", &self.counts)
            .field("selected", &self.selected)
            .field("tick", &self.simulation.tick())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl SessionController {
    /// Creates an idle session. Nothing is spawned until the first reset.
    ///
    /// # Errors
    ///
    /// [`SessionError::Config`] if `config` fails validation.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        debug!(?config, "session created");
        Ok(Self {
            simulation: Simulation::new(&config),
            spawner: Spawner::from_config(&config),
            config,
            state: SessionState::Idle,
            counts: Census::default(),
            selected: None,
            win_elapsed: Duration::ZERO,
            win_pending: false,
            listeners: Vec::new(),
        })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Clears the arena, restores the default zoom, spawns a fresh population
    /// and pauses.
    ///
    /// # Errors
    ///
    /// [`SessionError::Spawn`] if the arena saturated. The session is still
    /// paused and holds whatever was placed before the failure.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.state = SessionState::Paused;
        self.selected = None;
        self.win_elapsed = Duration::ZERO;
        self.win_pending = false;

        let arena = self.simulation.arena_mut();
        arena.clear();
        arena.set_zoom_index(self.config.default_zoom_index);

        let spawned = self
            .spawner
            .reset_population(arena, self.config.spawn_count_per_type);
        self.counts = self.simulation.arena().census();

        let ids = spawned?;
        info!(population = ids.len(), counts = %self.counts, "session reset");
        Ok(())
    }

    /// Starts ticking. Resets first if the session has never been reset.
    ///
    /// # Errors
    ///
    /// Propagates a failed initial reset; the session stays paused.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Running => return Ok(()),
            SessionState::Idle => self.reset()?,
            SessionState::Paused => {}
        }
        self.state = SessionState::Running;
        self.win_pending = false;
        info!(tick = self.simulation.tick(), "session started");
        Ok(())
    }

    /// Stops ticking. A win check already counting down still fires once.
    pub fn stop(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        self.state = SessionState::Paused;
        self.win_pending = self.win_elapsed > Duration::ZERO;
        info!(tick = self.simulation.tick(), "session stopped");
    }

    /// Advances the session by one host frame.
    ///
    /// Runs one tick if running, then advances the win-check timer by
    /// `elapsed`.
    ///
    /// # Errors
    ///
    /// [`SessionError::Sim`] if the tick failed; the session is stopped.
    /// [`SessionError::Spawn`] if a win triggered a reset that saturated.
    pub fn frame(&mut self, elapsed: Duration) -> Result<FrameReport, SessionError> {
        let tick = if self.state == SessionState::Running {
            match self.simulation.step() {
                Ok(report) => {
                    self.counts = report.census;
                    Some(report)
                }
                Err(err) => {
                    error!(%err, "tick failed, stopping session");
                    self.state = SessionState::Paused;
                    self.win_pending = false;
                    return Err(err.into());
                }
            }
        } else {
            None
        };

        let winner = self.advance_win_timer(elapsed)?;
        Ok(FrameReport { tick, winner })
    }

    fn advance_win_timer(&mut self, elapsed: Duration) -> Result<Option<Kind>, SessionError> {
        if self.state != SessionState::Running && !self.win_pending {
            return Ok(None);
        }
        self.win_elapsed += elapsed;
        if self.win_elapsed < self.config.win_check_interval() {
            return Ok(None);
        }
        self.win_elapsed = Duration::ZERO;
        self.win_pending = false;
        self.check_win()
    }

    /// Checks the latest counts for a winner.
    ///
    /// On a win, every listener is called with the winning kind and the
    /// session is reset.
    ///
    /// # Errors
    ///
    /// Propagates a failed reset.
    pub fn check_win(&mut self) -> Result<Option<Kind>, SessionError> {
        if self.counts.total() == 0 {
            return Ok(None);
        }
        let Some(winner) = self.counts.survivor() else {
            return Ok(None);
        };

        info!(%winner, tick = self.simulation.tick(), "win");
        for listener in &mut self.listeners {
            listener(winner);
        }
        self.reset()?;
        Ok(Some(winner))
    }

    /// Registers a callback for wins.
    pub fn on_win<F>(&mut self, listener: F)
    where
        F: FnMut(Kind) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Sets the speed multiplier from the next tick on.
    ///
    /// # Errors
    ///
    /// [`ParameterError::InvalidSpeed`] for non-finite or non-positive values;
    /// the old multiplier is kept.
    pub fn set_speed(&mut self, speed: f32) -> Result<(), ParameterError> {
        let speed = validate_speed(speed).inspect_err(|err| warn!(%err, "speed rejected"))?;
        self.config.speed_multiplier = speed;
        self.simulation.set_speed_multiplier(speed);
        debug!(speed, "speed changed");
        Ok(())
    }

    /// Sets the per-kind population used by the next reset.
    ///
    /// # Errors
    ///
    /// [`ParameterError::InvalidSpawnCount`] for zero or for a count whose
    /// total over every kind overflows; the old count is kept.
    pub fn set_spawn_count(&mut self, count: usize) -> Result<(), ParameterError> {
        let count =
            validate_spawn_count(count).inspect_err(|err| warn!(%err, "spawn count rejected"))?;
        self.config.spawn_count_per_type = count;
        debug!(count, "spawn count changed");
        Ok(())
    }

    /// Zooms in one level, scaling positions up. False at the top level.
    pub fn zoom_in(&mut self) -> bool {
        let changed = self.simulation.arena_mut().zoom_in();
        self.log_zoom(changed);
        changed
    }

    /// Zooms out one level, scaling positions down. False at the bottom level.
    pub fn zoom_out(&mut self) -> bool {
        let changed = self.simulation.arena_mut().zoom_out();
        self.log_zoom(changed);
        changed
    }

    /// Jumps to zoom level `index`. False if out of range or already there.
    pub fn set_zoom(&mut self, index: usize) -> bool {
        let changed = self.simulation.arena_mut().set_zoom_index(index);
        self.log_zoom(changed);
        changed
    }

    fn log_zoom(&self, changed: bool) {
        if changed {
            debug!(
                level = self.zoom_level(),
                scale = self.scale(),
                "zoom changed"
            );
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Selects the first entity, in ID order, within `tolerance` of `point`.
    ///
    /// A miss leaves the current selection alone.
    pub fn select_nearest(&mut self, point: Vec2, tolerance: f32) -> Option<EntityId> {
        let hit = self
            .simulation
            .arena()
            .entities()
            .iter()
            .find(|e| overlaps(*e, &point, tolerance))
            .map(Entity::id);
        if hit.is_some() {
            self.selected = hit;
        }
        hit
    }

    /// Selects with the scaled entity radius as tolerance, as for a click.
    pub fn select_at(&mut self, point: Vec2) -> Option<EntityId> {
        let tolerance = self.config.entity_radius * self.scale();
        self.select_nearest(point, tolerance)
    }

    /// Drops the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Entities in ID order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        self.simulation.arena().entities()
    }

    /// Counts from the latest tick, or from the latest reset if no tick has
    /// run since.
    #[must_use]
    pub fn counts(&self) -> Census {
        self.counts
    }

    /// The selected entity's display data.
    #[must_use]
    pub fn selected(&self) -> Option<Selected> {
        self.selected
            .and_then(|id| self.simulation.arena().get(id))
            .map(Selected::of)
    }

    /// True unless running.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state != SessionState::Running
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Ticks run since the session was created.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.simulation.tick()
    }

    /// Spawner seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.spawner.seed()
    }

    /// Current zoom scale.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.simulation.arena().scale()
    }

    /// Current zoom level index.
    #[must_use]
    pub fn zoom_level(&self) -> usize {
        self.simulation.arena().zoom_index()
    }

    /// Current configuration, including accepted parameter changes.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The underlying simulation.
    #[must_use]
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Mutable access to the simulation, for scripted setups.
    ///
    /// Counts are refreshed by the next tick or reset.
    #[must_use]
    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }
}

// =============================================================================
// Tests
// =============================================================================
