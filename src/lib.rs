//! marble-world - deterministic 2D marble physics for counterfactual experiments
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, collisions, scene, stepping, noise)
//! - `config`: Trial configuration records with load-time validation
//! - `trial`: One complete simulation run and its outcome
//! - `sweep`: Cartesian launch-parameter sweeps with streaming result files
//! - `ideals`: Ideal-case extraction over sweep results
//! - `campaign`: Noise-sampling campaigns over ideal pools
//! - `sink`: Append-only JSON-lines result files

pub mod campaign;
pub mod config;
pub mod error;
pub mod ideals;
pub mod rng;
pub mod sim;
pub mod sink;
pub mod sweep;
pub mod trial;

pub use config::{ExitSpec, LayoutSpec, MarbleSpec, TrialSpec, WallSpec, load_trials};
pub use error::{SimError, SimResult};
pub use trial::{RunOptions, TrialOutcome, run_trial};

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz, matching the recorded trials)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Step budget per trial (15 seconds of simulated time)
    pub const MAX_STEPS: u32 = 750;

    /// Standard arena dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
    pub const WALL_THICKNESS: f32 = 20.0;
    /// Portion of the left side marbles can exit through
    pub const EXIT_FRACTION: f32 = 1.0 / 3.0;
    /// How far the exit region extends beyond the arena boundary
    pub const EXIT_DEPTH: f32 = 60.0;

    /// Marble defaults
    pub const MARBLE_RADIUS: f32 = 30.0;
    /// Scales configured launch velocities into world units per second
    pub const SPEED_SCALE: f32 = 200.0;

    /// Position magnitude beyond which a run is flagged as diverged
    pub const DIVERGENCE_LIMIT: f32 = 1.0e4;
}

/// Launch velocity from a direction in degrees and a magnitude
#[inline]
pub fn velocity_from_polar(angle_deg: f32, magnitude: f32) -> Vec2 {
    let theta = angle_deg.to_radians();
    Vec2::new(theta.cos() * magnitude, theta.sin() * magnitude)
}

/// Rotate a vector by `angle` radians
#[inline]
pub fn rotate_vec(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}
