//! Collision resolver: pairwise contact, dominance and velocity exchange.
//!
//! Two entities are in contact when their centers are closer than
//! `contact_radius * scale`. On contact the dominant kind converts the other
//! one, then the two velocities are swapped whether or not a conversion
//! happened.
//!
//! # Pair enumeration
//!
//! [`PairMode::OrderedPairs`] visits every ordered pair `(i, j)` with
//! `i != j`, so each touching pair is resolved twice per tick: the second
//! visit swaps the velocities back and re-checks dominance on the updated
//! kinds. [`PairMode::UnorderedPairs`] visits each pair once.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::arena::Arena;
use crate::entity::Entity;
use crate::event::SimEvent;
use crate::geometry::overlaps;
use crate::simulation::TickReport;

use super::{Resolver, TickContext};

/// How entity pairs are enumerated each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairMode {
    /// Every ordered pair, each contact resolved twice.
    #[default]
    OrderedPairs,
    /// Every unordered pair, each contact resolved once.
    UnorderedPairs,
}

/// Outcome of a pair that was in contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    /// Conversion caused by the contact, if the kinds differed.
    pub conversion: Option<SimEvent>,
}

/// Resolves one pair. Returns `None` if the two are not touching.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use rps_core::entity::{Entity, EntityId, Kind};
/// use rps_core::resolver::resolve_pair;
///
/// let mut rock = Entity::new(EntityId::new(0), Kind::Rock, Vec2::new(100.0, 100.0), Vec2::X);
/// let mut scissors = Entity::new(EntityId::new(1), Kind::Scissors, Vec2::new(110.0, 100.0), Vec2::Y);
///
/// let contact = resolve_pair(&mut rock, &mut scissors, 40.0).unwrap();
/// assert!(contact.conversion.is_some());
/// assert_eq!(scissors.kind(), Kind::Rock);
/// assert_eq!(rock.velocity, Vec2::Y);
/// ```
pub fn resolve_pair(a: &mut Entity, b: &mut Entity, threshold: f32) -> Option<Contact> {
    if !overlaps(a, b, threshold) {
        return None;
    }

    let conversion = if a.kind().beats(b.kind()) {
        Some(convert(b, a))
    } else if b.kind().beats(a.kind()) {
        Some(convert(a, b))
    } else {
        None
    };

    std::mem::swap(&mut a.velocity, &mut b.velocity);
    Some(Contact { conversion })
}

fn convert(loser: &mut Entity, winner: &Entity) -> SimEvent {
    let from = loser.kind();
    loser.convert_to(winner.kind());
    trace!(entity = %loser.id(), by = %winner.id(), %from, to = %winner.kind(), "converted");
    SimEvent::Converted {
        entity: loser.id(),
        from,
        to: winner.kind(),
        by: winner.id(),
    }
}

/// Two distinct mutable entries of one slice, in the order asked for.
fn pair_mut(entities: &mut [Entity], i: usize, j: usize) -> (&mut Entity, &mut Entity) {
    debug_assert_ne!(i, j, "pair of an entity with itself");
    if i < j {
        let (lo, hi) = entities.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = entities.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}

/// Resolves every contact in the arena.
///
/// # Example
///
/// ```
/// use rps_core::resolver::{CollisionResolver, PairMode, Resolver};
///
/// let resolver = CollisionResolver::new(40.0, PairMode::UnorderedPairs);
/// assert_eq!(resolver.name(), "collision");
/// assert_eq!(resolver.pair_mode(), PairMode::UnorderedPairs);
/// ```
#[derive(Debug, Clone)]
pub struct CollisionResolver {
    /// Unscaled contact distance.
    contact_radius: f32,
    pair_mode: PairMode,
}

impl CollisionResolver {
    /// Creates a collision resolver.
    #[must_use]
    pub fn new(contact_radius: f32, pair_mode: PairMode) -> Self {
        Self {
            contact_radius,
            pair_mode,
        }
    }

    /// Pair enumeration in use.
    #[must_use]
    pub fn pair_mode(&self) -> PairMode {
        self.pair_mode
    }

    fn visit(entities: &mut [Entity], i: usize, j: usize, threshold: f32, report: &mut TickReport) {
        let (a, b) = pair_mut(entities, i, j);
        if let Some(contact) = resolve_pair(a, b, threshold) {
            report.contacts += 1;
            report.events.extend(contact.conversion);
        }
    }
}

impl Resolver for CollisionResolver {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn resolve(&self, _ctx: &TickContext, arena: &mut Arena, report: &mut TickReport) {
        let threshold = self.contact_radius * arena.scale();
        let entities = arena.entities_mut();
        let n = entities.len();

        match self.pair_mode {
            PairMode::OrderedPairs => {
                for i in 0..n {
                    for j in (0..n).filter(|&j| j != i) {
                        Self::visit(entities, i, j, threshold, report);
                    }
                }
            }
            PairMode::UnorderedPairs => {
                for i in 0..n {
                    for j in (i + 1)..n {
                        Self::visit(entities, i, j, threshold, report);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityId, Kind};
    use glam::Vec2;

    const CTX: TickContext = TickContext {
        tick: 0,
        speed_multiplier: 1.0,
    };

    fn entity(id: u64, kind: Kind, x: f32, velocity: Vec2) -> Entity {
        Entity::new(EntityId::new(id), kind, Vec2::new(x, 300.0), velocity)
    }

    mod pair_tests {
        use super::*;

        #[test]
        fn rock_converts_scissors_and_swaps() {
            let mut a = entity(0, Kind::Rock, 100.0, Vec2::new(0.5, 0.0));
            let mut b = entity(1, Kind::Scissors, 120.0, Vec2::new(-0.3, 0.2));

            let contact = resolve_pair(&mut a, &mut b, 40.0).unwrap();

            assert_eq!(a.kind(), Kind::Rock);
            assert_eq!(b.kind(), Kind::Rock);
            assert_eq!(b.history(), &[Kind::Scissors, Kind::Rock]);
            assert_eq!(a.history(), &[Kind::Rock]);
            assert_eq!(a.velocity, Vec2::new(-0.3, 0.2));
            assert_eq!(b.velocity, Vec2::new(0.5, 0.0));
            assert_eq!(
                contact.conversion,
                Some(SimEvent::Converted {
                    entity: EntityId::new(1),
                    from: Kind::Scissors,
                    to: Kind::Rock,
                    by: EntityId::new(0),
                })
            );
        }

        #[test]
        fn second_argument_can_dominate() {
            let mut a = entity(0, Kind::Rock, 100.0, Vec2::X);
            let mut b = entity(1, Kind::Paper, 110.0, Vec2::Y);
            resolve_pair(&mut a, &mut b, 40.0).unwrap();
            assert_eq!(a.kind(), Kind::Paper);
            assert_eq!(b.kind(), Kind::Paper);
            assert_eq!(a.history(), &[Kind::Rock, Kind::Paper]);
        }

        #[test]
        fn same_kind_only_swaps() {
            let mut a = entity(0, Kind::Paper, 100.0, Vec2::X);
            let mut b = entity(1, Kind::Paper, 130.0, Vec2::Y);

            let contact = resolve_pair(&mut a, &mut b, 40.0).unwrap();

            assert_eq!(contact.conversion, None);
            assert_eq!(a.history(), &[Kind::Paper]);
            assert_eq!(b.history(), &[Kind::Paper]);
            assert_eq!(a.velocity, Vec2::Y);
            assert_eq!(b.velocity, Vec2::X);
        }

        #[test]
        fn apart_is_untouched() {
            let mut a = entity(0, Kind::Rock, 100.0, Vec2::X);
            let mut b = entity(1, Kind::Scissors, 140.0, Vec2::Y);

            assert!(resolve_pair(&mut a, &mut b, 40.0).is_none());
            assert_eq!(b.kind(), Kind::Scissors);
            assert_eq!(a.velocity, Vec2::X);
        }

        #[test]
        fn pair_mut_respects_order() {
            let mut entities = vec![
                entity(0, Kind::Rock, 0.0, Vec2::ZERO),
                entity(1, Kind::Paper, 0.0, Vec2::ZERO),
                entity(2, Kind::Scissors, 0.0, Vec2::ZERO),
            ];
            let (a, b) = pair_mut(&mut entities, 2, 0);
            assert_eq!((a.kind(), b.kind()), (Kind::Scissors, Kind::Rock));
            let (a, b) = pair_mut(&mut entities, 0, 1);
            assert_eq!((a.kind(), b.kind()), (Kind::Rock, Kind::Paper));
        }
    }

    mod pair_mode_tests {
        use super::*;

        fn two_papers() -> (Arena, EntityId, EntityId) {
            let mut arena = Arena::default();
            let a = arena.spawn(Kind::Paper, Vec2::new(100.0, 100.0), Vec2::new(0.7, 0.1));
            let b = arena.spawn(Kind::Paper, Vec2::new(120.0, 100.0), Vec2::new(-0.2, 0.4));
            (arena, a, b)
        }

        #[test]
        fn ordered_pairs_swap_twice() {
            let (mut arena, a, b) = two_papers();
            let mut report = TickReport::new(0);
            CollisionResolver::new(40.0, PairMode::OrderedPairs).resolve(&CTX, &mut arena, &mut report);

            assert_eq!(report.contacts, 2);
            assert_eq!(arena.get(a).unwrap().velocity, Vec2::new(0.7, 0.1));
            assert_eq!(arena.get(b).unwrap().velocity, Vec2::new(-0.2, 0.4));
        }

        #[test]
        fn unordered_pairs_swap_once() {
            let (mut arena, a, b) = two_papers();
            let mut report = TickReport::new(0);
            CollisionResolver::new(40.0, PairMode::UnorderedPairs).resolve(&CTX, &mut arena, &mut report);

            assert_eq!(report.contacts, 1);
            assert_eq!(arena.get(a).unwrap().velocity, Vec2::new(-0.2, 0.4));
            assert_eq!(arena.get(b).unwrap().velocity, Vec2::new(0.7, 0.1));
        }

        #[test]
        fn ordered_pairs_convert_once() {
            let mut arena = Arena::default();
            arena.spawn(Kind::Rock, Vec2::new(100.0, 100.0), Vec2::X);
            let s = arena.spawn(Kind::Scissors, Vec2::new(110.0, 100.0), Vec2::Y);

            let mut report = TickReport::new(0);
            CollisionResolver::new(40.0, PairMode::OrderedPairs).resolve(&CTX, &mut arena, &mut report);

            // The second visit sees two rocks: no conversion, swap back
            assert_eq!(report.events.len(), 1);
            assert_eq!(arena.get(s).unwrap().kind(), Kind::Rock);
            assert_eq!(arena.get(s).unwrap().velocity, Vec2::Y);
        }

        #[test]
        fn contact_radius_scales_with_zoom() {
            let mut arena = Arena::default();
            arena.spawn(Kind::Rock, Vec2::new(100.0, 100.0), Vec2::X);
            let s = arena.spawn(Kind::Scissors, Vec2::new(130.0, 100.0), Vec2::Y);
            // Distance 30 at scale 1 becomes 15 at scale 0.5, threshold 20
            assert!(arena.zoom_out());

            let resolver = CollisionResolver::new(40.0, PairMode::UnorderedPairs);
            let mut report = TickReport::new(0);
            resolver.resolve(&CTX, &mut arena, &mut report);
            assert_eq!(arena.get(s).unwrap().kind(), Kind::Rock);

            let mut arena = Arena::default();
            arena.spawn(Kind::Rock, Vec2::new(100.0, 100.0), Vec2::X);
            let s = arena.spawn(Kind::Scissors, Vec2::new(130.0, 100.0), Vec2::Y);
            arena.zoom_out();
            arena.zoom_out();
            // Still scale 0.5 (floor); now push them apart past the threshold
            arena.get_mut(s).unwrap().position.x = 71.0;
            let mut report = TickReport::new(0);
            resolver.resolve(&CTX, &mut arena, &mut report);
            assert_eq!(report.contacts, 0);
            assert_eq!(arena.get(s).unwrap().kind(), Kind::Scissors);
        }

        #[test]
        fn pair_mode_serde_names() {
            assert_eq!(
                serde_json::to_string(&PairMode::OrderedPairs).unwrap(),
                "\"ordered_pairs\""
            );
            assert_eq!(PairMode::default(), PairMode::OrderedPairs);
        }
    }
}
