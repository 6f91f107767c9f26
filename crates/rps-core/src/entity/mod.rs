//! Entity module: the single simulated actor type.
//!
//! - [`EntityId`]: stable identifier, unchanged by conversion
//! - [`Kind`]: Rock, Paper or Scissors, with the dominance table
//! - [`Entity`]: kind, position, velocity and conversion history
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use rps_core::entity::{Entity, EntityId, Kind};
//!
//! let mut e = Entity::new(EntityId::new(7), Kind::Scissors, Vec2::new(50.0, 50.0), Vec2::X);
//! e.convert_to(Kind::Rock);
//!
//! assert_eq!(e.kind(), Kind::Rock);
//! assert_eq!(e.path(), "Scissors -> Rock");
//! ```

mod kind;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::{Bounds, Positioned};

pub use kind::Kind;

/// Unique identifier for an entity.
///
/// `EntityId` is a newtype wrapper around `u64`. IDs are assigned
/// monotonically by the arena and are never reused within a session, so
/// ordering by ID is ordering by spawn time.
///
/// # Example
///
/// ```
/// use rps_core::entity::EntityId;
///
/// let id1 = EntityId::new(1);
/// let id2 = EntityId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Per-tick motion parameters shared by every entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    /// Tick length. The simulation always advances by one unit tick.
    pub dt: f32,
    /// Global speed multiplier.
    pub speed_multiplier: f32,
    /// Current zoom scale.
    pub scale: f32,
    /// Unscaled entity radius; the wall margin is `radius * scale`.
    pub radius: f32,
}

/// One simulated actor.
///
/// # Invariants
///
/// - `history` is never empty
/// - the last element of `history` equals `kind`
///
/// Both hold by construction: `history` is private, seeded in [`Entity::new`]
/// and only appended to by [`Entity::convert_to`]. Deserialization checks them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EntityRecord")]
pub struct Entity {
    id: EntityId,
    kind: Kind,
    /// Position in arena coordinates.
    pub position: Vec2,
    /// Velocity in arena units per tick at scale 1 and speed 1.
    pub velocity: Vec2,
    history: Vec<Kind>,
}

/// Unchecked serialized form of [`Entity`].
#[derive(Deserialize)]
struct EntityRecord {
    id: EntityId,
    kind: Kind,
    position: Vec2,
    velocity: Vec2,
    history: Vec<Kind>,
}

impl TryFrom<EntityRecord> for Entity {
    type Error = String;

    fn try_from(record: EntityRecord) -> Result<Self, Self::Error> {
        if record.history.last() != Some(&record.kind) {
            return Err(format!(
                "entity {}: history {:?} must end in kind {}",
                record.id, record.history, record.kind
            ));
        }
        Ok(Self {
            id: record.id,
            kind: record.kind,
            position: record.position,
            velocity: record.velocity,
            history: record.history,
        })
    }
}

impl Entity {
    /// Creates an entity with an explicit velocity.
    #[must_use]
    pub fn new(id: EntityId, kind: Kind, position: Vec2, velocity: Vec2) -> Self {
        Self {
            id,
            kind,
            position,
            velocity,
            history: vec![kind],
        }
    }

    /// Creates an entity whose velocity components are drawn independently
    /// and uniformly from `[-1, 1]`.
    #[must_use]
    pub fn with_random_velocity<R: Rng + ?Sized>(
        id: EntityId,
        kind: Kind,
        position: Vec2,
        rng: &mut R,
    ) -> Self {
        let velocity = Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0));
        Self::new(id, kind, position, velocity)
    }

    /// Returns the entity's ID.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the current kind.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Every kind this entity has held, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Kind] {
        &self.history
    }

    /// Kind the entity was spawned as.
    #[must_use]
    pub fn origin(&self) -> Kind {
        self.history[0]
    }

    /// Number of conversions this entity has undergone.
    #[must_use]
    pub fn conversions(&self) -> usize {
        self.history.len() - 1
    }

    /// History joined for display, e.g. `"Rock -> Paper -> Scissors"`.
    #[must_use]
    pub fn path(&self) -> String {
        self.history
            .iter()
            .map(|k| k.name())
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Magnitude of the velocity.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// True if position and velocity are all finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }

    /// Converts the entity to `kind`, appending it to the history.
    ///
    /// Callers only convert on strict dominance, so `kind` always differs
    /// from the current kind.
    pub fn convert_to(&mut self, kind: Kind) {
        debug_assert_ne!(self.kind, kind, "conversion to the same kind");
        self.history.push(kind);
        self.kind = kind;
    }

    /// Advances the entity by one tick and reflects off the walls.
    ///
    /// The position moves first; then, per axis, if the coordinate lies
    /// inside the `radius * scale` margin of either edge, that velocity
    /// component is negated. The position is never clamped, so an entity can
    /// sit past the margin for a tick before its reversed velocity carries it
    /// back.
    pub fn integrate(&mut self, params: &MotionParams, bounds: &Bounds) {
        self.position += self.velocity * params.speed_multiplier * params.scale * params.dt;

        let margin = params.radius * params.scale;
        if bounds.margin_breached_x(self.position.x, margin) {
            self.velocity.x = -self.velocity.x;
        }
        if bounds.margin_breached_y(self.position.y, margin) {
            self.velocity.y = -self.velocity.y;
        }
    }
}

impl Positioned for Entity {
    #[inline]
    fn position(&self) -> Vec2 {
        self.position
    }
}
