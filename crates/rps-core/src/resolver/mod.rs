//! Resolver module: the stages of a simulation tick.
//!
//! Each tick runs the resolvers in a fixed order against the arena:
//! 1. [`MotionResolver`] integrates positions and reflects off the walls
//! 2. [`TallyResolver`] recounts the population
//! 3. [`CollisionResolver`] applies dominance and swaps velocities
//!
//! # Invariants
//!
//! - Resolvers MUST be deterministic given the same arena and context
//! - Resolvers MUST iterate entities in ID order
//! - Resolvers never add or remove entities, so population is conserved

mod collision;
mod motion;
mod tally;

pub use collision::{resolve_pair, CollisionResolver, Contact, PairMode};
pub use motion::{MotionResolver, UNIT_DT};
pub use tally::TallyResolver;

use crate::arena::Arena;
use crate::simulation::TickReport;

/// Per-tick values that can change between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// Tick being computed.
    pub tick: u64,
    /// Global speed multiplier.
    pub speed_multiplier: f32,
}

/// One stage of a tick.
///
/// Resolvers mutate the arena in place and record what happened in the
/// report. They hold their own fixed parameters; anything the host may change
/// mid-session arrives through [`TickContext`].
///
/// # Example
///
/// ```
/// use rps_core::arena::Arena;
/// use rps_core::resolver::{Resolver, TickContext};
/// use rps_core::simulation::TickReport;
///
/// struct Freeze;
///
/// impl Resolver for Freeze {
///     fn name(&self) -> &'static str {
///         "freeze"
///     }
///
///     fn resolve(&self, _ctx: &TickContext, arena: &mut Arena, _report: &mut TickReport) {
///         for entity in arena.entities_mut() {
///             entity.velocity = glam::Vec2::ZERO;
///         }
///     }
/// }
/// ```
pub trait Resolver: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Runs the stage.
    fn resolve(&self, ctx: &TickContext, arena: &mut Arena, report: &mut TickReport);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolver_is_object_safe() {
        fn _accepts_boxed(_resolver: Box<dyn Resolver>) {}
        fn _accepts_slice(_resolvers: &[Box<dyn Resolver>]) {}
    }

    #[test]
    fn default_stages_have_distinct_names() {
        let stages: Vec<Box<dyn Resolver>> = vec![
            Box::new(MotionResolver::new(20.0)),
            Box::new(TallyResolver),
            Box::new(CollisionResolver::new(40.0, PairMode::default())),
        ];
        let names: Vec<_> = stages.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["motion", "tally", "collision"]);
    }
}
