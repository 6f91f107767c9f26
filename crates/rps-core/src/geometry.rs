//! Geometry utilities: the overlap predicate and arena bounds.
//!
//! Every distance test in the simulation goes through [`overlaps`]. Thresholds
//! are always expressed as `radius * scale`, so overlap sensitivity follows the
//! current zoom level.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Anything with a position in arena space.
///
/// Implemented for bare points (`Vec2`) and for entities, so the same predicate
/// serves both entity-entity contact and point-entity selection.
pub trait Positioned {
    /// Returns the position in arena coordinates.
    fn position(&self) -> Vec2;
}

impl Positioned for Vec2 {
    #[inline]
    fn position(&self) -> Vec2 {
        *self
    }
}

/// Returns true iff the Euclidean distance between `a` and `b` is strictly
/// less than `threshold`.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use rps_core::geometry::overlaps;
///
/// assert!(overlaps(&Vec2::ZERO, &Vec2::new(3.0, 4.0), 5.1));
/// assert!(!overlaps(&Vec2::ZERO, &Vec2::new(3.0, 4.0), 5.0));
/// ```
#[inline]
#[must_use]
pub fn overlaps<A, B>(a: &A, b: &B, threshold: f32) -> bool
where
    A: Positioned + ?Sized,
    B: Positioned + ?Sized,
{
    a.position().distance(b.position()) < threshold
}

/// Rectangular arena extent. The origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Bounds {
    /// Creates bounds of the given size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Size as a vector.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// True if `pos` lies in `[0, width) x [0, height)`.
    #[must_use]
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x < self.width && pos.y >= 0.0 && pos.y < self.height
    }

    /// True if `x` is inside the left margin or beyond the right one.
    #[must_use]
    pub fn margin_breached_x(&self, x: f32, margin: f32) -> bool {
        x < margin || x > self.width - margin
    }

    /// True if `y` is inside the top margin or beyond the bottom one.
    #[must_use]
    pub fn margin_breached_y(&self, y: f32, margin: f32) -> bool {
        y < margin || y > self.height - margin
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
