//! Session configuration.
//!
//! [`SessionConfig`] carries every tunable the simulation reads. It is plain
//! serde data so hosts can load it from JSON and override single fields.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::entity::Kind;
use crate::error::{ConfigError, ParameterError};
use crate::geometry::Bounds;
use crate::resolver::PairMode;

/// Default discrete zoom scales.
pub const DEFAULT_ZOOM_LEVELS: [f32; 4] = [0.5, 1.0, 2.0, 4.0];

/// Configuration for a [`SessionController`](crate::session::SessionController).
///
/// Radii are unscaled; the simulation multiplies them by the current zoom
/// scale.
///
/// # Example
///
/// ```
/// use rps_core::config::SessionConfig;
///
/// let config = SessionConfig::with_bounds(1024.0, 768.0).with_seed(7);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.spawn_count_per_type, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Arena width
    pub width: f32,
    /// Arena height
    pub height: f32,
    /// Entities spawned per kind on reset
    pub spawn_count_per_type: usize,
    /// Global motion multiplier
    pub speed_multiplier: f32,
    /// Wall margin and selection radius
    pub entity_radius: f32,
    /// Contact distance for collisions
    pub contact_radius: f32,
    /// Minimum separation between freshly spawned entities
    pub spawn_clearance: f32,
    /// Discrete zoom scales, strictly ascending
    pub zoom_levels: Vec<f32>,
    /// Index into `zoom_levels` used after every reset
    pub default_zoom_index: usize,
    /// How collision pairs are enumerated each tick
    pub pair_mode: PairMode,
    /// Rejection-sampling budget per spawned entity
    pub spawn_max_attempts: u32,
    /// Win-check cadence in milliseconds of frame time
    pub win_check_interval_ms: u64,
    /// Master seed for spawn positions and velocities
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            spawn_count_per_type: 3,
            speed_multiplier: 1.0,
            entity_radius: 20.0,
            contact_radius: 40.0,
            spawn_clearance: 50.0,
            zoom_levels: DEFAULT_ZOOM_LEVELS.to_vec(),
            default_zoom_index: 1,
            pair_mode: PairMode::OrderedPairs,
            spawn_max_attempts: 10_000,
            win_check_interval_ms: 1_000,
            seed: 0,
        }
    }
}

impl SessionConfig {
    /// Default config with the given arena size.
    #[must_use]
    pub fn with_bounds(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Sets the master seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the per-kind spawn count.
    #[must_use]
    pub fn with_spawn_count(mut self, count: usize) -> Self {
        self.spawn_count_per_type = count;
        self
    }

    /// Sets the speed multiplier.
    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed_multiplier = speed;
        self
    }

    /// Sets the collision pair enumeration.
    #[must_use]
    pub fn with_pair_mode(mut self, mode: PairMode) -> Self {
        self.pair_mode = mode;
        self
    }

    /// Sets the win-check cadence.
    #[must_use]
    pub fn with_win_check_interval(mut self, interval: Duration) -> Self {
        self.win_check_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Arena bounds.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    /// Win-check cadence.
    #[must_use]
    pub fn win_check_interval(&self) -> Duration {
        Duration::from_millis(self.win_check_interval_ms)
    }

    /// Checks every field.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = self.width.is_finite() && self.height.is_finite();
        if !(finite && self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::InvalidBounds {
                width: self.width,
                height: self.height,
            });
        }
        for (name, value) in [
            ("entity_radius", self.entity_radius),
            ("contact_radius", self.contact_radius),
            ("spawn_clearance", self.spawn_clearance),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidRadius { name, value });
            }
        }
        let ascending = self.zoom_levels.windows(2).all(|w| w[0] < w[1]);
        let positive = self.zoom_levels.iter().all(|z| z.is_finite() && *z > 0.0);
        if self.zoom_levels.is_empty() || !ascending || !positive {
            return Err(ConfigError::InvalidZoomLevels(self.zoom_levels.clone()));
        }
        if self.default_zoom_index >= self.zoom_levels.len() {
            return Err(ConfigError::InvalidZoomIndex {
                index: self.default_zoom_index,
                len: self.zoom_levels.len(),
            });
        }
        if self.spawn_max_attempts == 0 {
            return Err(ConfigError::InvalidSpawnAttempts);
        }
        if self.win_check_interval_ms == 0 {
            return Err(ConfigError::InvalidWinCheckInterval);
        }
        validate_speed(self.speed_multiplier)?;
        validate_spawn_count(self.spawn_count_per_type)?;
        Ok(())
    }
}

/// Accepts finite, strictly positive speed multipliers.
///
/// # Errors
///
/// [`ParameterError::InvalidSpeed`] otherwise.
pub fn validate_speed(speed: f32) -> Result<f32, ParameterError> {
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err(ParameterError::InvalidSpeed(speed))
    }
}

/// Accepts spawn counts of at least one whose total over every kind fits
/// in a `usize`.
///
/// # Errors
///
/// [`ParameterError::InvalidSpawnCount`] otherwise.
pub fn validate_spawn_count(count: usize) -> Result<usize, ParameterError> {
    if count >= 1 && count.checked_mul(Kind::ALL.len()).is_some() {
        Ok(count)
    } else {
        Err(ParameterError::InvalidSpawnCount(count))
    }
}
