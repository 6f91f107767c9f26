//! Test helper functions for setting up sessions and arenas.

use glam::Vec2;

use crate::arena::Arena;
use crate::config::SessionConfig;
use crate::entity::{EntityId, Kind};
use crate::resolver::PairMode;
use crate::session::SessionController;
use crate::simulation::Simulation;

// =============================================================================
// Scenario Setup
// =============================================================================

/// A session with the default config and the given seed, already reset.
pub fn reset_session(seed: u64) -> SessionController {
    let mut session = SessionController::new(SessionConfig::default().with_seed(seed))
        .expect("default config is valid");
    session.reset().expect("default arena never saturates");
    session
}

/// A simulation with no entities and the given pair mode.
pub fn empty_simulation(pair_mode: PairMode) -> Simulation {
    Simulation::new(&SessionConfig::default().with_pair_mode(pair_mode))
}

/// Spawns two entities `gap` apart on a horizontal line through the middle of
/// the arena. Each side is given as its kind and velocity.
pub fn spawn_pair(
    arena: &mut Arena,
    left: (Kind, Vec2),
    right: (Kind, Vec2),
    gap: f32,
) -> (EntityId, EntityId) {
    let a = arena.spawn(left.0, Vec2::new(400.0, 300.0), left.1);
    let b = arena.spawn(right.0, Vec2::new(400.0 + gap, 300.0), right.1);
    (a, b)
}

// =============================================================================
// State Access
// =============================================================================

/// Every position in ID order.
pub fn positions(arena: &Arena) -> Vec<Vec2> {
    arena.entities().iter().map(|e| e.position).collect()
}

/// Every velocity in ID order.
pub fn velocities(arena: &Arena) -> Vec<Vec2> {
    arena.entities().iter().map(|e| e.velocity).collect()
}

/// Every kind in ID order.
pub fn kinds(arena: &Arena) -> Vec<Kind> {
    arena.entities().iter().map(|e| e.kind()).collect()
}

/// Runs `ticks` ticks, panicking on a tick error.
pub fn run_ticks(sim: &mut Simulation, ticks: usize) {
    for _ in 0..ticks {
        sim.step().expect("tick failed");
    }
}
