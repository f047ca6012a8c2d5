//! Batch sweeper: Cartesian enumeration of the var body's launch parameters.
//!
//! Every (delay, angle, magnitude) combination runs once without noise and
//! contributes one result line, streamed to disk as it completes. Row order
//! on disk is iteration order: delay outermost, then angle, magnitude
//! innermost — consumers can reconstruct the grid from that.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::TrialSpec;
use crate::error::{SimError, SimResult};
use crate::rng::TrialRng;
use crate::sink::ResultSink;
use crate::trial::{RunOptions, TrialOutcome, run_trial};

/// Discrete parameter grid for one sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepRanges {
    /// Release delays in ticks.
    pub delays: Vec<u32>,
    /// Launch directions in degrees.
    pub angles_deg: Vec<f32>,
    /// Launch magnitudes in configuration units.
    pub magnitudes: Vec<f32>,
}

impl Default for SweepRanges {
    /// The grid used for the recorded experiments: delays 0..100 by 5,
    /// angles 90..270 degrees by 5, magnitudes 1.0..3.0 by 0.1.
    fn default() -> Self {
        Self {
            delays: (0..100u32).step_by(5).collect(),
            angles_deg: (90..270u32).step_by(5).map(|a| a as f32).collect(),
            magnitudes: (10..30u32).map(|m| m as f32 / 10.0).collect(),
        }
    }
}

impl SweepRanges {
    pub fn combination_count(&self) -> usize {
        self.delays.len() * self.angles_deg.len() * self.magnitudes.len()
    }
}

/// One sweep row: the parameter combination plus the outcome summary the
/// ideal-case criteria consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepEntry {
    pub delay: u32,
    pub angle_deg: f32,
    pub magnitude: f32,
    pub passed: bool,
    pub min_exit_dist_sq: f32,
    /// Tick of the first marble-marble contact, if any occurred.
    pub first_contact_tick: Option<u32>,
    /// Wall bounces of the var body before the first marble-marble contact.
    pub var_wall_bounces: u32,
}

impl SweepEntry {
    pub fn from_outcome(
        delay: u32,
        angle_deg: f32,
        magnitude: f32,
        var: &str,
        outcome: &TrialOutcome,
    ) -> Self {
        let first_contact_tick = outcome.collisions.first().map(|c| c.tick);
        let cutoff = first_contact_tick.unwrap_or(u32::MAX);
        let var_wall_bounces = outcome
            .wall_bounces
            .iter()
            .filter(|b| b.tick < cutoff && b.involves(var))
            .count() as u32;
        Self {
            delay,
            angle_deg,
            magnitude,
            passed: outcome.passed,
            min_exit_dist_sq: outcome.min_exit_dist_sq,
            first_contact_tick,
            var_wall_bounces,
        }
    }
}

/// Aggregate pass tally for a completed sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub passed: u32,
    pub total: u32,
}

/// Run the full grid without noise, streaming one entry per combination to
/// `out_path`.
///
/// A combination that fails validation is logged and skipped so the sweep
/// always completes; I/O and serialization failures abort it, and entries
/// already flushed remain usable.
pub fn run_all(
    spec: &TrialSpec,
    ranges: &SweepRanges,
    out_path: impl AsRef<Path>,
) -> SimResult<SweepSummary> {
    spec.validate()?;
    let mut sink = ResultSink::create(out_path)?;
    // Never drawn from: every sweep combination runs noise-free
    let mut rng = TrialRng::seeded(0);
    let mut summary = SweepSummary {
        passed: 0,
        total: 0,
    };

    for &delay in &ranges.delays {
        log::info!("sweeping delay {delay}");
        for &angle_deg in &ranges.angles_deg {
            for &magnitude in &ranges.magnitudes {
                let combo = spec.with_var_launch(delay, angle_deg, magnitude);
                let outcome = match run_trial(&combo, &RunOptions::default(), &mut rng) {
                    Ok(outcome) => outcome,
                    Err(err @ SimError::Config { .. }) => {
                        log::warn!(
                            "skipping combination ({delay}, {angle_deg}, {magnitude}): {err}"
                        );
                        continue;
                    }
                    Err(err) => return Err(err),
                };
                let entry =
                    SweepEntry::from_outcome(delay, angle_deg, magnitude, &spec.var, &outcome);
                sink.append(&entry)?;
                summary.total += 1;
                if entry.passed {
                    summary.passed += 1;
                }
            }
        }
    }

    sink.finish()?;
    Ok(summary)
}
