//! Arena module: the container for all entities in a session.
//!
//! The Arena provides:
//! - Entity storage with deterministic iteration order (by ID)
//! - Lookup by ID
//! - The bounds every entity bounces inside
//! - The discrete zoom scale, with proportional rescaling of positions
//! - Tick tracking
//!
//! # Determinism
//!
//! Entities live in a `Vec` that is only ever appended to with monotonically
//! increasing IDs, so it is always sorted by ID. Iteration order is therefore
//! spawn order, and lookups are a binary search. Collision resolution needs
//! two simultaneous mutable borrows by index, which a map cannot give cheaply.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use rps_core::arena::Arena;
//! use rps_core::entity::Kind;
//! use rps_core::geometry::Bounds;
//!
//! let mut arena = Arena::new(Bounds::new(800.0, 600.0), vec![0.5, 1.0, 2.0, 4.0], 1);
//! let id = arena.spawn(Kind::Rock, Vec2::new(100.0, 100.0), Vec2::new(0.5, 0.5));
//!
//! assert!(arena.zoom_in());
//! assert_eq!(arena.get(id).unwrap().position, Vec2::new(200.0, 200.0));
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::census::Census;
use crate::entity::{Entity, EntityId, Kind};
use crate::geometry::Bounds;

/// Arena containing every entity of a session.
///
/// Deserialization checks the zoom index and ID ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ArenaRecord")]
pub struct Arena {
    bounds: Bounds,
    /// Sorted by ID; see the module docs.
    entities: Vec<Entity>,
    /// Monotonically increasing entity ID counter. Survives `clear()`.
    next_id: u64,
    zoom_levels: Vec<f32>,
    zoom_index: usize,
    tick: u64,
}

/// Unchecked serialized form of [`Arena`].
#[derive(Deserialize)]
struct ArenaRecord {
    bounds: Bounds,
    entities: Vec<Entity>,
    next_id: u64,
    zoom_levels: Vec<f32>,
    zoom_index: usize,
    tick: u64,
}

impl TryFrom<ArenaRecord> for Arena {
    type Error = String;

    fn try_from(record: ArenaRecord) -> Result<Self, Self::Error> {
        if record.zoom_index >= record.zoom_levels.len() {
            return Err(format!(
                "zoom index {} out of range for {} levels",
                record.zoom_index,
                record.zoom_levels.len()
            ));
        }
        let ascending = record.entities.windows(2).all(|w| w[0].id() < w[1].id());
        let issued = record
            .entities
            .last()
            .is_none_or(|e| e.id().as_u64() < record.next_id);
        if !(ascending && issued) {
            return Err("entity ids must be ascending and below next_id".to_owned());
        }
        Ok(Self {
            bounds: record.bounds,
            entities: record.entities,
            next_id: record.next_id,
            zoom_levels: record.zoom_levels,
            zoom_index: record.zoom_index,
            tick: record.tick,
        })
    }
}

impl Arena {
    /// Creates an empty arena at zoom level `zoom_index`.
    ///
    /// # Panics
    ///
    /// Panics if `zoom_index` is out of range for `zoom_levels`. Validated
    /// configs never trigger this.
    #[must_use]
    pub fn new(bounds: Bounds, zoom_levels: Vec<f32>, zoom_index: usize) -> Self {
        assert!(
            zoom_index < zoom_levels.len(),
            "zoom index {zoom_index} out of range"
        );
        Self {
            bounds,
            entities: Vec::new(),
            next_id: 0,
            zoom_levels,
            zoom_index,
            tick: 0,
        }
    }

    /// Spawns an entity with an explicit velocity and returns its ID.
    pub fn spawn(&mut self, kind: Kind, position: Vec2, velocity: Vec2) -> EntityId {
        self.spawn_with(|id| Entity::new(id, kind, position, velocity))
    }

    /// Spawns an entity built by `build` from a freshly assigned ID.
    ///
    /// # Panics
    ///
    /// Panics if `build` returns an entity with a different ID.
    pub fn spawn_with<F>(&mut self, build: F) -> EntityId
    where
        F: FnOnce(EntityId) -> Entity,
    {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;

        let entity = build(id);
        assert_eq!(entity.id(), id, "spawned entity must keep its assigned id");
        self.entities.push(entity);
        id
    }

    /// Removes every entity. IDs keep counting from where they were.
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Returns a reference to an entity by ID.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    /// Returns a mutable reference to an entity by ID.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index_of(id).map(move |i| &mut self.entities[i])
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, Entity::id).ok()
    }

    /// Entities in ID order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Mutable entities in ID order. The slice cannot grow or shrink, so the
    /// ordering invariant holds.
    #[must_use]
    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    /// Iterator over entity IDs in order.
    pub fn entity_ids_sorted(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter().map(Entity::id)
    }

    /// Returns the number of entities in the arena.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the arena has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Current per-kind counts.
    #[must_use]
    pub fn census(&self) -> Census {
        Census::tally(&self.entities)
    }

    /// Arena bounds.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Current zoom scale.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.zoom_levels[self.zoom_index]
    }

    /// Index of the current zoom level.
    #[must_use]
    pub const fn zoom_index(&self) -> usize {
        self.zoom_index
    }

    /// Available zoom scales.
    #[must_use]
    pub fn zoom_levels(&self) -> &[f32] {
        &self.zoom_levels
    }

    /// Moves to zoom level `index`, rescaling every position by new/old scale.
    ///
    /// Returns false, changing nothing, if `index` is out of range or already
    /// current.
    pub fn set_zoom_index(&mut self, index: usize) -> bool {
        if index >= self.zoom_levels.len() || index == self.zoom_index {
            return false;
        }
        let ratio = self.zoom_levels[index] / self.scale();
        for entity in &mut self.entities {
            entity.position *= ratio;
        }
        self.zoom_index = index;
        true
    }

    /// One level up. No-op at the top level.
    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom_index(self.zoom_index + 1)
    }

    /// One level down. No-op at the bottom level.
    pub fn zoom_out(&mut self) -> bool {
        match self.zoom_index.checked_sub(1) {
            Some(index) => self.set_zoom_index(index),
            None => false,
        }
    }

    /// Returns the current simulation tick.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advances the simulation tick counter.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(Bounds::default(), crate::config::DEFAULT_ZOOM_LEVELS.to_vec(), 1)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Arena {
        Arena::default()
    }

    mod storage_tests {
        use super::*;

        #[test]
        fn new_creates_empty_arena() {
            let arena = arena();
            assert!(arena.is_empty());
            assert_eq!(arena.entity_count(), 0);
            assert_eq!(arena.current_tick(), 0);
            assert!((arena.scale() - 1.0).abs() < f32::EPSILON);
        }

        #[test]
        fn spawn_assigns_sequential_ids() {
            let mut arena = arena();
            let id1 = arena.spawn(Kind::Rock, Vec2::ZERO, Vec2::ZERO);
            let id2 = arena.spawn(Kind::Paper, Vec2::ZERO, Vec2::ZERO);
            let id3 = arena.spawn(Kind::Scissors, Vec2::ZERO, Vec2::ZERO);

            assert_eq!(id1, EntityId::new(0));
            assert_eq!(id2, EntityId::new(1));
            assert_eq!(id3, EntityId::new(2));
            assert_eq!(arena.entity_count(), 3);
        }

        #[test]
        fn get_returns_entity() {
            let mut arena = arena();
            let id = arena.spawn(Kind::Paper, Vec2::new(1.0, 2.0), Vec2::ZERO);
            let entity = arena.get(id).unwrap();
            assert_eq!(entity.id(), id);
            assert_eq!(entity.kind(), Kind::Paper);
        }

        #[test]
        fn get_nonexistent_returns_none() {
            assert!(arena().get(EntityId::new(999)).is_none());
        }

        #[test]
        fn get_mut_modification_persists() {
            let mut arena = arena();
            let id = arena.spawn(Kind::Rock, Vec2::ZERO, Vec2::ZERO);
            arena.get_mut(id).unwrap().convert_to(Kind::Paper);
            assert_eq!(arena.get(id).unwrap().kind(), Kind::Paper);
        }

        #[test]
        fn ids_continue_after_clear() {
            let mut arena = arena();
            arena.spawn(Kind::Rock, Vec2::ZERO, Vec2::ZERO);
            arena.spawn(Kind::Rock, Vec2::ZERO, Vec2::ZERO);
            arena.clear();
            assert!(arena.is_empty());

            let id = arena.spawn(Kind::Rock, Vec2::ZERO, Vec2::ZERO);
            assert_eq!(id, EntityId::new(2));
            assert!(arena.get(EntityId::new(0)).is_none());
        }

        #[test]
        fn iteration_is_id_ordered() {
            let mut arena = arena();
            for kind in [Kind::Scissors, Kind::Rock, Kind::Paper] {
                arena.spawn(kind, Vec2::ZERO, Vec2::ZERO);
            }
            let ids: Vec<_> = arena.entity_ids_sorted().collect();
            assert_eq!(
                ids,
                vec![EntityId::new(0), EntityId::new(1), EntityId::new(2)]
            );
        }

        #[test]
        #[should_panic(expected = "spawned entity must keep its assigned id")]
        fn spawn_with_rejects_foreign_id() {
            let mut arena = arena();
            arena.spawn_with(|_| Entity::new(EntityId::new(77), Kind::Rock, Vec2::ZERO, Vec2::ZERO));
        }

        #[test]
        fn census_counts_kinds() {
            let mut arena = arena();
            arena.spawn(Kind::Rock, Vec2::ZERO, Vec2::ZERO);
            arena.spawn(Kind::Rock, Vec2::ZERO, Vec2::ZERO);
            arena.spawn(Kind::Scissors, Vec2::ZERO, Vec2::ZERO);
            let census = arena.census();
            assert_eq!((census.rock, census.paper, census.scissors), (2, 0, 1));
        }

        #[test]
        fn advance_tick_increments() {
            let mut arena = arena();
            arena.advance_tick();
            arena.advance_tick();
            assert_eq!(arena.current_tick(), 2);
        }
    }

    mod zoom_tests {
        use super::*;

        #[test]
        fn zoom_in_doubles_positions() {
            let mut arena = arena();
            let id = arena.spawn(Kind::Rock, Vec2::new(120.0, 45.5), Vec2::ZERO);

            assert!(arena.zoom_in());
            assert!((arena.scale() - 2.0).abs() < f32::EPSILON);
            assert_eq!(arena.get(id).unwrap().position, Vec2::new(240.0, 91.0));
        }

        #[test]
        fn zoom_roundtrip_restores_positions() {
            let mut arena = arena();
            let original = Vec2::new(313.37, 271.8);
            let id = arena.spawn(Kind::Paper, original, Vec2::ZERO);

            assert!(arena.zoom_in());
            assert!(arena.zoom_out());

            let pos = arena.get(id).unwrap().position;
            assert!(pos.abs_diff_eq(original, 1e-4), "{pos} != {original}");
        }

        #[test]
        fn zoom_out_halves_positions() {
            let mut arena = arena();
            let id = arena.spawn(Kind::Rock, Vec2::new(100.0, 50.0), Vec2::ZERO);
            assert!(arena.zoom_out());
            assert!((arena.scale() - 0.5).abs() < f32::EPSILON);
            assert_eq!(arena.get(id).unwrap().position, Vec2::new(50.0, 25.0));
        }

        #[test]
        fn zoom_is_noop_at_ends() {
            let mut arena = arena();
            let id = arena.spawn(Kind::Rock, Vec2::new(10.0, 10.0), Vec2::ZERO);

            assert!(arena.zoom_out());
            assert!(!arena.zoom_out());
            assert_eq!(arena.zoom_index(), 0);
            assert_eq!(arena.get(id).unwrap().position, Vec2::new(5.0, 5.0));

            assert!(arena.zoom_in());
            assert!(arena.zoom_in());
            assert!(arena.zoom_in());
            assert!(!arena.zoom_in());
            assert_eq!(arena.zoom_index(), 3);
            assert_eq!(arena.get(id).unwrap().position, Vec2::new(40.0, 40.0));
        }

        #[test]
        fn set_zoom_index_to_current_is_noop() {
            let mut arena = arena();
            assert!(!arena.set_zoom_index(1));
            assert!(!arena.set_zoom_index(9));
        }

        #[test]
        fn zoom_does_not_touch_velocity() {
            let mut arena = arena();
            let id = arena.spawn(Kind::Rock, Vec2::ONE, Vec2::new(0.3, -0.4));
            arena.zoom_in();
            assert_eq!(arena.get(id).unwrap().velocity, Vec2::new(0.3, -0.4));
        }
    }

    #[test]
    fn serialization_roundtrip() {
        let mut arena = arena();
        arena.spawn(Kind::Rock, Vec2::new(100.0, 200.0), Vec2::X);
        arena.advance_tick();

        let json = serde_json::to_string(&arena).unwrap();
        let mut back: Arena = serde_json::from_str(&json).unwrap();

        assert_eq!(back.entity_count(), 1);
        assert_eq!(back.current_tick(), 1);
        // Next spawned entity continues the ID sequence
        assert_eq!(
            back.spawn(Kind::Paper, Vec2::ZERO, Vec2::ZERO),
            EntityId::new(1)
        );
    }

    #[test]
    fn deserialize_rejects_inconsistent_state() {
        let mut arena = arena();
        arena.spawn(Kind::Rock, Vec2::new(100.0, 200.0), Vec2::X);
        arena.spawn(Kind::Paper, Vec2::new(300.0, 200.0), Vec2::X);
        let json = serde_json::to_value(&arena).unwrap();

        let mut bad_zoom = json.clone();
        bad_zoom["zoom_index"] = serde_json::json!(9);
        assert!(serde_json::from_value::<Arena>(bad_zoom).is_err());

        let mut reused_id = json.clone();
        reused_id["next_id"] = serde_json::json!(1);
        assert!(serde_json::from_value::<Arena>(reused_id).is_err());

        let mut unsorted = json;
        let entities = unsorted["entities"].as_array_mut().unwrap();
        entities.swap(0, 1);
        assert!(serde_json::from_value::<Arena>(unsorted).is_err());
    }
}
