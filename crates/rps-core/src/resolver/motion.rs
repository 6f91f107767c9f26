//! Motion resolver: integration and wall reflection.
//!
//! The simulation always advances by one unit tick; the effective velocity is
//! scaled by the speed multiplier and the current zoom scale instead.

use crate::arena::Arena;
use crate::entity::MotionParams;
use crate::simulation::TickReport;

use super::{Resolver, TickContext};

/// Length of one tick.
pub const UNIT_DT: f32 = 1.0;

/// Moves every entity by one tick and reflects it off the wall margins.
///
/// # Example
///
/// ```
/// use rps_core::resolver::{MotionResolver, Resolver};
///
/// let resolver = MotionResolver::new(20.0);
/// assert_eq!(resolver.name(), "motion");
/// ```
#[derive(Debug, Clone)]
pub struct MotionResolver {
    dt: f32,
    /// Unscaled wall margin.
    radius: f32,
}

impl MotionResolver {
    /// Creates a motion resolver with the given entity radius.
    #[must_use]
    pub fn new(radius: f32) -> Self {
        Self {
            dt: UNIT_DT,
            radius,
        }
    }

    /// Unscaled entity radius used as the wall margin.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Resolver for MotionResolver {
    fn name(&self) -> &'static str {
        "motion"
    }

    fn resolve(&self, ctx: &TickContext, arena: &mut Arena, _report: &mut TickReport) {
        let params = MotionParams {
            dt: self.dt,
            speed_multiplier: ctx.speed_multiplier,
            scale: arena.scale(),
            radius: self.radius,
        };
        let bounds = arena.bounds();

        for entity in arena.entities_mut() {
            entity.integrate(&params, &bounds);
        }
    }
}
