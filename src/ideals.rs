//! Ideal-case extraction: filter sweep entries whose deterministic outcome
//! unambiguously fits a causal-role criterion.
//!
//! Extraction only reads already-computed tallies — it never resimulates, so
//! its output is always a subset of its input, in the input's (delay-major)
//! order.

use std::path::Path;

use crate::error::SimResult;
use crate::sink::{ResultSink, read_jsonl};
use crate::sweep::SweepEntry;

/// Causal-role criteria over one sweep entry.
///
/// Distance thresholds are in world units and compare against the entry's
/// squared minimum distance.
#[derive(Debug, Clone, Copy)]
pub enum IdealCriterion {
    /// Target passes, having come within `max_dist` of the exit.
    Helper { max_dist: f32 },
    /// Target misses, staying farther than `min_dist` from the exit.
    Hinderer { min_dist: f32 },
    /// Target passes after a marble-marble contact, with the var body
    /// bouncing off walls at most `max_bounces` times beforehand.
    Obstacle { max_bounces: u32, max_dist: f32 },
    /// Obstacle shape with a stricter bounce limit.
    NonObstacle { max_bounces: u32, max_dist: f32 },
    /// Caller-supplied predicate.
    Custom(fn(&SweepEntry) -> bool),
}

impl IdealCriterion {
    /// Helper with no distance restriction.
    pub fn helper() -> Self {
        Self::Helper {
            max_dist: f32::INFINITY,
        }
    }

    /// Hinderer with no distance restriction.
    pub fn hinderer() -> Self {
        Self::Hinderer { min_dist: 0.0 }
    }

    pub fn obstacle() -> Self {
        Self::Obstacle {
            max_bounces: 4,
            max_dist: f32::INFINITY,
        }
    }

    pub fn non_obstacle() -> Self {
        Self::NonObstacle {
            max_bounces: 2,
            max_dist: f32::INFINITY,
        }
    }

    /// Whether `entry` is ideal under this criterion.
    pub fn is_ideal(&self, entry: &SweepEntry) -> bool {
        match *self {
            Self::Helper { max_dist } => {
                entry.passed && entry.min_exit_dist_sq < max_dist * max_dist
            }
            Self::Hinderer { min_dist } => {
                !entry.passed && entry.min_exit_dist_sq > min_dist * min_dist
            }
            Self::Obstacle {
                max_bounces,
                max_dist,
            }
            | Self::NonObstacle {
                max_bounces,
                max_dist,
            } => {
                // A contactless run cannot support an obstacle-role judgment
                entry.passed
                    && entry.first_contact_tick.is_some()
                    && entry.min_exit_dist_sq < max_dist * max_dist
                    && entry.var_wall_bounces <= max_bounces
            }
            Self::Custom(predicate) => predicate(entry),
        }
    }
}

/// Filter a sweep in memory.
pub fn get_ideals(entries: &[SweepEntry], criterion: IdealCriterion) -> Vec<SweepEntry> {
    entries
        .iter()
        .filter(|entry| criterion.is_ideal(entry))
        .cloned()
        .collect()
}

/// Filter a sweep result file into an ideal-pool file. Returns the number of
/// entries kept.
pub fn get_ideals_file(
    in_path: impl AsRef<Path>,
    out_path: impl AsRef<Path>,
    criterion: IdealCriterion,
) -> SimResult<usize> {
    let entries: Vec<SweepEntry> = read_jsonl(in_path)?;
    let ideals = get_ideals(&entries, criterion);
    let mut sink = ResultSink::create(out_path)?;
    for entry in &ideals {
        sink.append(entry)?;
    }
    sink.finish()?;
    Ok(ideals.len())
}
