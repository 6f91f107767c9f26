//! Events emitted by a tick.
//!
//! Events are collected into the [`TickReport`](crate::simulation::TickReport)
//! in the order they happened. They describe state changes; they never drive
//! them, so a host can ignore them without affecting the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::{EntityId, Kind};

/// Something that happened during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    /// `entity` was converted from `from` to `to` on contact with `by`.
    Converted {
        /// Entity that changed kind
        entity: EntityId,
        /// Kind before the contact
        from: Kind,
        /// Kind after the contact
        to: Kind,
        /// Dominant entity
        by: EntityId,
    },
}

impl SimEvent {
    /// Entity the event is about.
    #[must_use]
    pub const fn entity(&self) -> EntityId {
        match self {
            Self::Converted { entity, .. } => *entity,
        }
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converted {
                entity,
                from,
                to,
                by,
            } => write!(f, "entity {entity} converted {from} -> {to} by entity {by}"),
        }
    }
}
