//! Error types.
//!
//! Everything here is recoverable. Parameter errors leave the previous value in
//! place; spawn and tick errors stop the session and are handed back to the
//! host.

use thiserror::Error;

use crate::entity::{EntityId, Kind};

/// A rejected parameter change. The prior value is retained.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ParameterError {
    /// Speed multiplier must be finite and positive.
    #[error("speed multiplier {0} must be finite and greater than zero")]
    InvalidSpeed(f32),
    /// Spawn count must be at least one per kind, and the total population
    /// must fit in a `usize`.
    #[error("spawn count {0} must be at least 1 and not overflow the population")]
    InvalidSpawnCount(usize),
}

/// Invalid [`SessionConfig`](crate::config::SessionConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Arena width or height is not finite and positive.
    #[error("arena dimensions {width}x{height} must be finite and positive")]
    InvalidBounds {
        /// Configured width
        width: f32,
        /// Configured height
        height: f32,
    },
    /// A radius is not positive.
    #[error("{name} {value} must be positive")]
    InvalidRadius {
        /// Which radius
        name: &'static str,
        /// Configured value
        value: f32,
    },
    /// Zoom levels are empty, non-positive or not strictly ascending.
    #[error("zoom levels {0:?} must be positive and strictly ascending")]
    InvalidZoomLevels(Vec<f32>),
    /// Default zoom index is out of range.
    #[error("default zoom index {index} out of range for {len} levels")]
    InvalidZoomIndex {
        /// Configured index
        index: usize,
        /// Number of zoom levels
        len: usize,
    },
    /// Spawn attempts must be at least one.
    #[error("spawn_max_attempts must be at least 1")]
    InvalidSpawnAttempts,
    /// Win check interval must be non-zero.
    #[error("win_check_interval_ms must be at least 1")]
    InvalidWinCheckInterval,
    /// A parameter shared with the runtime mutators is invalid.
    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

/// The bounded spawn search gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// No free position was found within the attempt budget.
    #[error("arena saturated: no free position for {kind} after {attempts} attempts")]
    Saturated {
        /// Kind being spawned
        kind: Kind,
        /// Attempts made
        attempts: u32,
    },
}

/// A tick produced an invalid state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimError {
    /// Position or velocity became NaN or infinite.
    #[error("entity {entity} has a non-finite position or velocity")]
    NonFinite {
        /// Offending entity
        entity: EntityId,
    },
}

/// Errors surfaced by the session controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// Configuration was rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// Population could not be spawned.
    #[error("spawn failed: {0}")]
    Spawn(#[from] SpawnError),
    /// A tick failed; the session has been stopped.
    #[error("tick failed: {0}")]
    Sim(#[from] SimError),
}
