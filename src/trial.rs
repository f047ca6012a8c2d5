//! Trial runner: one complete simulation from a configuration record.
//!
//! A run ends as soon as the target reaches the exit (the outcome is fixed at
//! that point and cannot be retracted), when a position diverges past the
//! sanity bound, or when the step budget expires. State is sampled at tick
//! boundaries, before each step, so the initial configuration counts toward
//! the minimum-distance trace and recorded paths.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::TrialSpec;
use crate::consts::{DIVERGENCE_LIMIT, MAX_STEPS};
use crate::error::{SimError, SimResult};
use crate::rng::TrialRng;
use crate::sim::scene::ContactEvent;
use crate::sim::{NoiseSpec, Scene, step};

/// Options layered on top of a trial configuration. Noise is a sampling
/// concern and path recording an export concern; neither belongs to the
/// scene itself.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub noise: Option<NoiseSpec>,
    /// Names of bodies whose per-tick positions and velocities are recorded.
    pub record_paths: Vec<String>,
}

/// Recorded motion of one body, one sample per tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyPath {
    pub positions: Vec<Vec2>,
    pub velocities: Vec<Vec2>,
}

/// Result of one simulation run. Produced fresh per run, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    /// Whether the target body reached the exit opening.
    pub passed: bool,
    /// Minimum observed squared distance from the target to the exit center.
    pub min_exit_dist_sq: f32,
    /// Ticks simulated before the run ended.
    pub ticks: u32,
    /// Set when the sanity bound on position magnitude was exceeded; such a
    /// run is reported as missed with this diagnostic flag.
    pub diverged: bool,
    /// Marble-marble contacts in temporal order.
    pub collisions: Vec<ContactEvent>,
    /// Marble-wall contacts in temporal order.
    pub wall_bounces: Vec<ContactEvent>,
    /// Present only for bodies requested in `RunOptions::record_paths`.
    pub paths: BTreeMap<String, BodyPath>,
}

/// Run one trial to completion.
pub fn run_trial(
    spec: &TrialSpec,
    opts: &RunOptions,
    rng: &mut TrialRng,
) -> SimResult<TrialOutcome> {
    let mut scene = Scene::from_spec(spec)?;
    for name in &opts.record_paths {
        if scene.marble(name).is_none() {
            return Err(SimError::config(format!(
                "unknown body {name:?} in path recording"
            )));
        }
    }
    if let Some(noise) = &opts.noise {
        if scene.marble(&noise.body).is_none() {
            return Err(SimError::config(format!(
                "unknown body {:?} in noise spec",
                noise.body
            )));
        }
    }
    // Existence guaranteed by Scene::from_spec validation
    let target = scene
        .marble_index(&spec.target)
        .ok_or_else(|| SimError::config(format!("unknown target body {:?}", spec.target)))?;

    let mut paths: BTreeMap<String, BodyPath> = opts
        .record_paths
        .iter()
        .map(|name| (name.clone(), BodyPath::default()))
        .collect();
    let mut min_dist_sq = f32::MAX;
    let mut diverged = false;

    while scene.tick < MAX_STEPS {
        for (name, path) in paths.iter_mut() {
            if let Some(marble) = scene.marble(name) {
                path.positions.push(marble.pos);
                path.velocities.push(marble.vel);
            }
        }
        min_dist_sq = min_dist_sq.min(scene.exit.center_dist_sq(scene.marbles[target].pos));

        match opts.noise.as_ref() {
            Some(noise) => step(&mut scene, Some((noise, &mut *rng))),
            None => step(&mut scene, None),
        }

        if scene.marbles[target].passed_exit {
            break;
        }
        if scene.marbles.iter().any(|m| m.pos.length() > DIVERGENCE_LIMIT) {
            diverged = true;
            break;
        }
    }

    Ok(TrialOutcome {
        passed: scene.marbles[target].passed_exit,
        min_exit_dist_sq: min_dist_sq,
        ticks: scene.tick,
        diverged,
        collisions: scene.events.collisions,
        wall_bounces: scene.events.wall_bounces,
        paths,
    })
}
