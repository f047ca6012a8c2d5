//! Axis-aligned rectangle geometry for walls and the exit opening.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box defined by center and half extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    /// Build from a center plus full length (x) and height (y).
    pub fn from_extents(center: Vec2, length: f32, height: f32) -> Self {
        Self::new(center, Vec2::new(length, height))
    }

    /// Lower-left corner
    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    /// Upper-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    /// Closest point of the box to `p` (`p` itself when inside).
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }

    /// Squared distance from `p` to the box (zero inside).
    pub fn dist_sq(&self, p: Vec2) -> f32 {
        (p - self.closest_point(p)).length_squared()
    }

    /// Whether a circle overlaps the box.
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        self.dist_sq(center) < radius * radius
    }

    /// Whether the interiors of two boxes overlap. Shared edges and corners
    /// do not count, so tiled walls are not flagged.
    pub fn overlaps_interior(&self, other: &Rect) -> bool {
        let (amin, amax) = (self.min(), self.max());
        let (bmin, bmax) = (other.min(), other.max());
        amin.x < bmax.x && bmin.x < amax.x && amin.y < bmax.y && bmin.y < amax.y
    }

    pub fn is_degenerate(&self) -> bool {
        self.half.x <= 0.0 || self.half.y <= 0.0
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_closest_point_is_inside(
            cx in -100.0f32..100.0, cy in -100.0f32..100.0,
            w in 0.1f32..50.0, h in 0.1f32..50.0,
            px in -200.0f32..200.0, py in -200.0f32..200.0,
        ) {
            let rect = Rect::from_extents(Vec2::new(cx, cy), w, h);
            let closest = rect.closest_point(Vec2::new(px, py));
            prop_assert!(rect.contains_point(closest));
        }

        #[test]
        fn prop_contained_points_have_zero_distance(
            cx in -100.0f32..100.0, cy in -100.0f32..100.0,
            w in 0.1f32..50.0, h in 0.1f32..50.0,
            tx in 0.0f32..1.0, ty in 0.0f32..1.0,
        ) {
            let rect = Rect::from_extents(Vec2::new(cx, cy), w, h);
            let p = rect.min() + Vec2::new(w * tx, h * ty);
            // Allow one ulp of rounding slack at the far corner
            prop_assert!(rect.dist_sq(p) < 1e-9);
        }
    }
}
