//! Single-shot launch perturbation for counterfactual sampling.
//!
//! Noise models uncertainty in launch parameters, not ongoing stochastic
//! forcing: it fires exactly once per trial, at the activation tick of the
//! designated body. With a zero level no random draw happens at all, so the
//! run stays bit-identical to the deterministic one.

use serde::{Deserialize, Serialize};

use super::scene::Marble;
use crate::rng::TrialRng;
use crate::rotate_vec;

/// When and how one marble's launch is perturbed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseSpec {
    /// Name of the perturbed body.
    pub body: String,
    /// Tick at which the perturbation fires (the body's release tick).
    pub tick: u32,
    /// Standard deviation of the angular deviation, radians.
    pub angle_sigma: f32,
    /// Half-width of the uniform relative magnitude perturbation.
    pub magnitude_jitter: f32,
}

impl NoiseSpec {
    /// Both perturbation widths driven by a single noise level.
    pub fn at_level(body: impl Into<String>, tick: u32, level: f32) -> Self {
        Self {
            body: body.into(),
            tick,
            angle_sigma: level,
            magnitude_jitter: level,
        }
    }
}

/// Perturb `marble`'s velocity if the spec is scheduled for it at `tick`.
///
/// The velocity direction is rotated by a Normal(0, angle_sigma) draw and its
/// magnitude scaled by 1 + Uniform(-jitter, +jitter), clamped at zero.
pub fn maybe_perturb(marble: &mut Marble, tick: u32, spec: &NoiseSpec, rng: &mut TrialRng) {
    if spec.body != marble.name || spec.tick != tick {
        return;
    }
    if spec.angle_sigma > 0.0 {
        let angle = rng.normal(0.0, spec.angle_sigma);
        marble.vel = rotate_vec(marble.vel, angle);
    }
    if spec.magnitude_jitter > 0.0 {
        let scale = 1.0 + rng.range(-spec.magnitude_jitter, spec.magnitude_jitter);
        marble.vel *= scale.max(0.0);
    }
}
