//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Explicit, caller-owned RNG for the single-shot launch noise
//! - Stable iteration order (configuration order)
//! - No rendering or I/O dependencies

pub mod collision;
pub mod geometry;
pub mod noise;
pub mod scene;
pub mod step;

pub use collision::{
    CollisionResult, circle_circle_collision, circle_rect_collision, reflect_velocity,
};
pub use geometry::Rect;
pub use noise::{NoiseSpec, maybe_perturb};
pub use scene::{ContactEvent, ExitRegion, Marble, Scene, SceneEvents, Wall};
pub use step::step;
