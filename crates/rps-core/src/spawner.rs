//! Spawner: randomized, non-overlapping placement.
//!
//! Positions are rejection-sampled uniformly over the arena and rejected when
//! they fall within `clearance * scale` of any entity already present. The
//! search is bounded; a crowded arena reports [`SpawnError::Saturated`]
//! instead of looping forever.
//!
//! # Determinism
//!
//! All randomness comes from one `ChaCha8Rng` seeded at construction, so the
//! seed fixes every position and velocity of every reset in a session.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use crate::arena::Arena;
use crate::config::SessionConfig;
use crate::entity::{Entity, EntityId, Kind};
use crate::error::SpawnError;
use crate::geometry::overlaps;

/// Places new entities into an arena.
///
/// # Example
///
/// ```
/// use rps_core::arena::Arena;
/// use rps_core::spawner::Spawner;
///
/// let mut arena = Arena::default();
/// let mut spawner = Spawner::new(42, 50.0, 10_000);
///
/// let ids = spawner.reset_population(&mut arena, 3).unwrap();
/// assert_eq!(ids.len(), 9);
/// assert_eq!(arena.census().rock, 3);
/// ```
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: ChaCha8Rng,
    seed: u64,
    /// Unscaled minimum distance to existing entities.
    clearance: f32,
    max_attempts: u32,
}

impl Spawner {
    /// Creates a spawner.
    #[must_use]
    pub fn new(seed: u64, clearance: f32, max_attempts: u32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            clearance,
            max_attempts,
        }
    }

    /// Creates a spawner from the seed, clearance and attempt budget of
    /// `config`.
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.seed, config.spawn_clearance, config.spawn_max_attempts)
    }

    /// Seed the spawner was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Spawns one `kind` entity at a free position with a random velocity.
    ///
    /// # Errors
    ///
    /// [`SpawnError::Saturated`] if no candidate cleared every existing
    /// entity within the attempt budget. The arena is left unchanged.
    pub fn spawn_unique(&mut self, kind: Kind, arena: &mut Arena) -> Result<EntityId, SpawnError> {
        let bounds = arena.bounds();
        let threshold = self.clearance * arena.scale();

        for _ in 0..self.max_attempts {
            let candidate = Vec2::new(
                self.rng.gen_range(0.0..bounds.width),
                self.rng.gen_range(0.0..bounds.height),
            );
            if arena
                .entities()
                .iter()
                .any(|e| overlaps(e, &candidate, threshold))
            {
                continue;
            }

            let rng = &mut self.rng;
            return Ok(arena.spawn_with(|id| Entity::with_random_velocity(id, kind, candidate, rng)));
        }

        warn!(
            %kind,
            attempts = self.max_attempts,
            population = arena.entity_count(),
            "arena saturated"
        );
        Err(SpawnError::Saturated {
            kind,
            attempts: self.max_attempts,
        })
    }

    /// Spawns `per_type` entities of each kind, Rock first, then Paper, then
    /// Scissors.
    ///
    /// Every placement is checked against everything already in the arena,
    /// including entities spawned earlier in the same call.
    ///
    /// # Errors
    ///
    /// Stops at the first [`SpawnError`]; entities placed before it remain.
    pub fn reset_population(
        &mut self,
        arena: &mut Arena,
        per_type: usize,
    ) -> Result<Vec<EntityId>, SpawnError> {
        let mut ids = Vec::new();
        for kind in Kind::ALL {
            for _ in 0..per_type {
                ids.push(self.spawn_unique(kind, arena)?);
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;

    fn arena() -> Arena {
        Arena::default()
    }

    mod placement_tests {
        use super::*;

        #[test]
        fn spawns_inside_bounds() {
            let mut arena = arena();
            let mut spawner = Spawner::new(1, 50.0, 10_000);
            spawner.reset_population(&mut arena, 5).unwrap();
            let bounds = arena.bounds();
            for e in arena.entities() {
                assert!(bounds.contains(e.position), "{:?} outside", e.position);
            }
        }

        #[test]
        fn population_respects_clearance() {
            let mut arena = arena();
            let mut spawner = Spawner::new(7, 50.0, 10_000);
            spawner.reset_population(&mut arena, 6).unwrap();

            let entities = arena.entities();
            for (i, a) in entities.iter().enumerate() {
                for b in &entities[i + 1..] {
                    assert!(
                        a.position.distance(b.position) >= 50.0,
                        "{} and {} too close",
                        a.id(),
                        b.id()
                    );
                }
            }
        }

        #[test]
        fn clearance_scales_with_zoom() {
            let mut arena = arena();
            assert!(arena.zoom_out());
            let mut spawner = Spawner::new(3, 50.0, 10_000);
            spawner.reset_population(&mut arena, 4).unwrap();

            let entities = arena.entities();
            for (i, a) in entities.iter().enumerate() {
                for b in &entities[i + 1..] {
                    assert!(a.position.distance(b.position) >= 25.0);
                }
            }
        }

        #[test]
        fn kinds_in_spawn_order() {
            let mut arena = arena();
            let mut spawner = Spawner::new(0, 50.0, 10_000);
            spawner.reset_population(&mut arena, 2).unwrap();
            let kinds: Vec<_> = arena.entities().iter().map(Entity::kind).collect();
            assert_eq!(
                kinds,
                vec![
                    Kind::Rock,
                    Kind::Rock,
                    Kind::Paper,
                    Kind::Paper,
                    Kind::Scissors,
                    Kind::Scissors
                ]
            );
        }

        #[test]
        fn velocities_in_unit_square() {
            let mut arena = arena();
            let mut spawner = Spawner::new(11, 50.0, 10_000);
            spawner.reset_population(&mut arena, 5).unwrap();
            for e in arena.entities() {
                assert!(e.velocity.x.abs() <= 1.0 && e.velocity.y.abs() <= 1.0);
            }
        }
    }

    mod determinism_tests {
        use super::*;

        #[test]
        fn same_seed_same_population() {
            let mut a = arena();
            let mut b = arena();
            Spawner::new(42, 50.0, 10_000)
                .reset_population(&mut a, 3)
                .unwrap();
            Spawner::new(42, 50.0, 10_000)
                .reset_population(&mut b, 3)
                .unwrap();
            assert_eq!(a.entities(), b.entities());
        }

        #[test]
        fn different_seed_different_population() {
            let mut a = arena();
            let mut b = arena();
            Spawner::new(1, 50.0, 10_000)
                .reset_population(&mut a, 3)
                .unwrap();
            Spawner::new(2, 50.0, 10_000)
                .reset_population(&mut b, 3)
                .unwrap();
            assert_ne!(a.entities(), b.entities());
        }
    }

    mod saturation_tests {
        use super::*;

        #[test]
        fn crowded_arena_reports_saturation() {
            let mut arena = Arena::new(Bounds::new(100.0, 100.0), vec![1.0], 0);
            let mut spawner = Spawner::new(5, 50.0, 200);

            let err = spawner.reset_population(&mut arena, 10).unwrap_err();
            assert!(matches!(err, SpawnError::Saturated { attempts: 200, .. }));
            // Whatever was placed before giving up is still there
            assert!(!arena.is_empty());
            assert!(arena.entity_count() < 30);
        }

        #[test]
        fn huge_count_saturates_instead_of_panicking() {
            let mut arena = Arena::new(Bounds::new(10.0, 10.0), vec![1.0], 0);
            let mut spawner = Spawner::new(5, 50.0, 50);

            let err = spawner
                .reset_population(&mut arena, usize::MAX / 2)
                .unwrap_err();
            assert!(matches!(err, SpawnError::Saturated { kind: Kind::Rock, .. }));
            assert_eq!(arena.entity_count(), 1);
        }

        #[test]
        fn failed_spawn_leaves_arena_unchanged() {
            let mut arena = Arena::new(Bounds::new(10.0, 10.0), vec![1.0], 0);
            arena.spawn(Kind::Rock, Vec2::new(5.0, 5.0), Vec2::ZERO);
            let mut spawner = Spawner::new(5, 50.0, 50);

            assert_eq!(
                spawner.spawn_unique(Kind::Paper, &mut arena),
                Err(SpawnError::Saturated {
                    kind: Kind::Paper,
                    attempts: 50
                })
            );
            assert_eq!(arena.entity_count(), 1);
        }
    }
}
