//! Tally resolver: recounts the population between motion and collisions.

use crate::arena::Arena;
use crate::census::Census;
use crate::simulation::TickReport;

use super::{Resolver, TickContext};

/// Recomputes the census from scratch into the tick report.
///
/// Runs before collisions, so the reported counts describe the population
/// as it stood when contacts were evaluated.
#[derive(Debug, Clone, Copy, Default)]
pub struct TallyResolver;

impl Resolver for TallyResolver {
    fn name(&self) -> &'static str {
        "tally"
    }

    fn resolve(&self, _ctx: &TickContext, arena: &mut Arena, report: &mut TickReport) {
        report.census = Census::tally(arena.entities());
    }
}
