//! Simulation module: the tick loop.
//!
//! The `Simulation` struct owns the arena and runs a fixed resolver pipeline
//! once per tick:
//!
//! 1. **MOTION**: integrate every entity and reflect off the walls
//! 2. **TALLY**: recount the population from scratch
//! 3. **COLLISION**: resolve contacts per the configured [`PairMode`]
//! 4. **CHECK**: reject non-finite state, then advance the tick counter
//!
//! # Determinism
//!
//! A tick has no randomness. Entities are visited in ID order by every stage,
//! so the same arena always produces the same next arena.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use rps_core::config::SessionConfig;
//! use rps_core::entity::Kind;
//! use rps_core::simulation::Simulation;
//!
//! let mut sim = Simulation::new(&SessionConfig::default());
//! sim.arena_mut().spawn(Kind::Rock, Vec2::new(100.0, 100.0), Vec2::new(0.5, 0.5));
//!
//! for _ in 0..10 {
//!     sim.step().unwrap();
//! }
//!
//! assert_eq!(sim.tick(), 10);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::arena::Arena;
use crate::census::Census;
use crate::config::SessionConfig;
use crate::error::SimError;
use crate::event::SimEvent;
use crate::resolver::{
    CollisionResolver, MotionResolver, PairMode, Resolver, TallyResolver, TickContext,
};

// =============================================================================
// TickReport
// =============================================================================

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick that was computed.
    pub tick: u64,
    /// Population after motion, before collisions.
    pub census: Census,
    /// Number of pair visits that were in contact.
    pub contacts: usize,
    /// Conversions, in resolution order.
    pub events: Vec<SimEvent>,
}

impl TickReport {
    /// Empty report for `tick`.
    #[must_use]
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            ..Default::default()
        }
    }

    /// Number of conversions.
    #[must_use]
    pub fn conversions(&self) -> usize {
        self.events.len()
    }
}

// =============================================================================
// Simulation
// =============================================================================

/// Runs ticks over an arena.
///
/// `speed_multiplier` is not validated here; the session controller is the
/// only caller that changes it and rejects bad values first.
pub struct Simulation {
    arena: Arena,
    /// Stages, run in order.
    resolvers: Vec<Box<dyn Resolver>>,
    speed_multiplier: f32,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("arena", &self.arena)
            .field(
                "resolvers",
                &self.resolvers.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .field("speed_multiplier", &self.speed_multiplier)
            .finish()
    }
}

impl Simulation {
    /// Creates an empty simulation with the default pipeline.
    ///
    /// The config is assumed valid.
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        let arena = Arena::new(
            config.bounds(),
            config.zoom_levels.clone(),
            config.default_zoom_index,
        );
        Self::with_resolvers(
            arena,
            default_pipeline(config.entity_radius, config.contact_radius, config.pair_mode),
            config.speed_multiplier,
        )
    }

    /// Creates a simulation with an explicit arena and pipeline.
    #[must_use]
    pub fn with_resolvers(
        arena: Arena,
        resolvers: Vec<Box<dyn Resolver>>,
        speed_multiplier: f32,
    ) -> Self {
        Self {
            arena,
            resolvers,
            speed_multiplier,
        }
    }

    /// Executes one tick.
    ///
    /// # Errors
    ///
    /// [`SimError::NonFinite`] if any entity ends the tick with a NaN or
    /// infinite position or velocity. The tick counter is not advanced in
    /// that case.
    pub fn step(&mut self) -> Result<TickReport, SimError> {
        let tick = self.arena.current_tick();
        let ctx = TickContext {
            tick,
            speed_multiplier: self.speed_multiplier,
        };
        let mut report = TickReport::new(tick);

        for resolver in &self.resolvers {
            resolver.resolve(&ctx, &mut self.arena, &mut report);
        }

        if let Some(bad) = self.arena.entities().iter().find(|e| !e.is_finite()) {
            return Err(SimError::NonFinite { entity: bad.id() });
        }

        self.arena.advance_tick();
        Ok(report)
    }

    /// Returns a read-only reference to the arena.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Returns a mutable reference to the arena.
    ///
    /// Use this for setup (spawning, zoom) between ticks.
    #[must_use]
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// Number of ticks run so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.arena.current_tick()
    }

    /// Current speed multiplier.
    #[must_use]
    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Sets the speed multiplier used from the next tick on.
    pub fn set_speed_multiplier(&mut self, speed: f32) {
        self.speed_multiplier = speed;
    }

    /// Appends a stage after the existing ones.
    pub fn add_resolver(&mut self, resolver: Box<dyn Resolver>) {
        self.resolvers.push(resolver);
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }
}

/// Motion, tally, collision.
#[must_use]
pub fn default_pipeline(
    entity_radius: f32,
    contact_radius: f32,
    pair_mode: PairMode,
) -> Vec<Box<dyn Resolver>> {
    vec![
        Box::new(MotionResolver::new(entity_radius)),
        Box::new(TallyResolver),
        Box::new(CollisionResolver::new(contact_radius, pair_mode)),
    ]
}

// =============================================================================
// Tests
// =============================================================================
