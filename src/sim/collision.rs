//! Collision detection and response for circles against boxes and each other.
//!
//! Detection returns the contact normal and penetration depth so the stepper
//! can correct positions and no interpenetration is carried into the next
//! tick. Response is restitution-scaled reflection along the normal.

use glam::Vec2;

use super::geometry::Rect;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point (if hit)
    pub point: Vec2,
    /// Surface normal at the contact, pointing toward the circle center
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between a circle and an axis-aligned box.
pub fn circle_rect_collision(pos: Vec2, radius: f32, rect: &Rect) -> CollisionResult {
    let closest = rect.closest_point(pos);
    let offset = pos - closest;
    let dist_sq = offset.length_squared();

    if dist_sq >= radius * radius {
        return CollisionResult::miss();
    }

    if dist_sq > 1e-12 {
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: offset / dist,
            penetration: radius - dist,
        };
    }

    // Center inside the box (tunneling case): push out along the nearest face
    let min = rect.min();
    let max = rect.max();
    let to_left = pos.x - min.x;
    let to_right = max.x - pos.x;
    let to_bottom = pos.y - min.y;
    let to_top = max.y - pos.y;
    let nearest = to_left.min(to_right).min(to_bottom).min(to_top);

    let normal = if nearest == to_left {
        Vec2::new(-1.0, 0.0)
    } else if nearest == to_right {
        Vec2::new(1.0, 0.0)
    } else if nearest == to_bottom {
        Vec2::new(0.0, -1.0)
    } else {
        Vec2::new(0.0, 1.0)
    };

    CollisionResult {
        hit: true,
        point: pos,
        normal,
        penetration: radius + nearest,
    }
}

/// Check collision between two circles. The normal points from `b` toward `a`.
pub fn circle_circle_collision(
    pos_a: Vec2,
    radius_a: f32,
    pos_b: Vec2,
    radius_b: f32,
) -> CollisionResult {
    let offset = pos_a - pos_b;
    let dist_sq = offset.length_squared();
    let radius_sum = radius_a + radius_b;

    if dist_sq >= radius_sum * radius_sum {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    // Coincident centers: pick a fixed axis so the response stays deterministic
    let normal = if dist > 1e-6 {
        offset / dist
    } else {
        Vec2::new(1.0, 0.0)
    };

    CollisionResult {
        hit: true,
        point: pos_b + normal * radius_b,
        normal,
        penetration: radius_sum - dist,
    }
}

/// Reflect velocity off a surface: v' = v - (1 + e)(v.n)n
///
/// With restitution 1 this is a perfect mirror; lower values bleed off the
/// normal component.
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    velocity - (1.0 + restitution) * velocity.dot(normal) * normal
}
