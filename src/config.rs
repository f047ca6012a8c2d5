//! Trial configuration records and load-time validation.
//!
//! A configuration file is a JSON array of trial records; a record index
//! selects one trial. Every field is explicit and checked when a record is
//! loaded or a scene is built from it, so a bad configuration fails before
//! any simulation runs.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::consts::*;
use crate::error::{SimError, SimResult};
use crate::sim::geometry::Rect;
use crate::velocity_from_polar;

/// Initial state of one marble.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarbleSpec {
    pub name: String,
    pub position: Vec2,
    /// Launch velocity in configuration units, scaled by the trial's
    /// `speed_scale` at release.
    pub velocity: Vec2,
    /// Ticks before the marble is released.
    #[serde(default)]
    pub delay: u32,
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default = "default_restitution")]
    pub restitution: f32,
}

fn default_radius() -> f32 {
    MARBLE_RADIUS
}

fn default_restitution() -> f32 {
    1.0
}

/// An immovable box collider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallSpec {
    pub name: String,
    pub position: Vec2,
    pub length: f32,
    pub height: f32,
}

impl WallSpec {
    pub fn rect(&self) -> Rect {
        Rect::from_extents(self.position, self.length, self.height)
    }
}

/// The exit opening. Place it at the boundary gap, extending outward, so a
/// marble can only reach it by leaving through the opening.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitSpec {
    pub position: Vec2,
    pub length: f32,
    pub height: f32,
}

impl ExitSpec {
    pub fn rect(&self) -> Rect {
        Rect::from_extents(self.position, self.length, self.height)
    }
}

/// Static geometry for one trial. Replaces the standard marble box when a
/// record carries its own layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSpec {
    pub walls: Vec<WallSpec>,
    pub exit: ExitSpec,
}

impl LayoutSpec {
    /// The recorded experiments' arena: an 800x600 box with 20-thick walls
    /// and an exit gap covering the middle third of the left side. The wall
    /// segments tile without interior overlap and the right side is open.
    pub fn standard() -> Self {
        let gap = WORLD_HEIGHT * EXIT_FRACTION;
        let side = (WORLD_HEIGHT - gap) / 2.0 - WALL_THICKNESS;
        Self {
            walls: vec![
                WallSpec {
                    name: "bottom_wall".into(),
                    position: Vec2::new(WORLD_WIDTH / 2.0, WALL_THICKNESS / 2.0),
                    length: WORLD_WIDTH,
                    height: WALL_THICKNESS,
                },
                WallSpec {
                    name: "top_wall".into(),
                    position: Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT - WALL_THICKNESS / 2.0),
                    length: WORLD_WIDTH,
                    height: WALL_THICKNESS,
                },
                WallSpec {
                    name: "bottom_left_wall".into(),
                    position: Vec2::new(WALL_THICKNESS / 2.0, WALL_THICKNESS + side / 2.0),
                    length: WALL_THICKNESS,
                    height: side,
                },
                WallSpec {
                    name: "top_left_wall".into(),
                    position: Vec2::new(
                        WALL_THICKNESS / 2.0,
                        WORLD_HEIGHT - WALL_THICKNESS - side / 2.0,
                    ),
                    length: WALL_THICKNESS,
                    height: side,
                },
            ],
            exit: ExitSpec {
                position: Vec2::new(-EXIT_DEPTH / 2.0, WORLD_HEIGHT / 2.0),
                length: EXIT_DEPTH,
                height: gap,
            },
        }
    }
}

/// One trial record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialSpec {
    #[serde(default)]
    pub name: String,
    /// Order defines update order.
    pub marbles: Vec<MarbleSpec>,
    /// Obstacles added on top of the layout's walls.
    #[serde(default)]
    pub extra_walls: Vec<WallSpec>,
    /// Body whose launch parameters are swept or perturbed.
    pub var: String,
    /// Body whose exit passage is the trial outcome.
    pub target: String,
    /// Custom geometry; the standard marble box when absent.
    #[serde(default)]
    pub layout: Option<LayoutSpec>,
    #[serde(default = "default_speed_scale")]
    pub speed_scale: f32,
}

fn default_speed_scale() -> f32 {
    SPEED_SCALE
}

impl TrialSpec {
    pub fn marble(&self, name: &str) -> Option<&MarbleSpec> {
        self.marbles.iter().find(|m| m.name == name)
    }

    /// Clone with the var marble's launch set to (delay, angle, magnitude).
    pub fn with_var_launch(&self, delay: u32, angle_deg: f32, magnitude: f32) -> Self {
        let mut spec = self.clone();
        let var = spec.var.clone();
        if let Some(marble) = spec.marbles.iter_mut().find(|m| m.name == var) {
            marble.velocity = velocity_from_polar(angle_deg, magnitude);
            marble.delay = delay;
        }
        spec
    }

    /// Check structural invariants. All violations are configuration errors,
    /// surfaced before any simulation runs.
    pub fn validate(&self) -> SimResult<()> {
        if self.marbles.is_empty() {
            return Err(SimError::config("trial has no marbles"));
        }
        if self.speed_scale <= 0.0 {
            return Err(SimError::config("speed_scale must be positive"));
        }
        for (i, marble) in self.marbles.iter().enumerate() {
            if marble.radius <= 0.0 {
                return Err(SimError::config(format!(
                    "marble {:?} has non-positive radius",
                    marble.name
                )));
            }
            if self.marbles[..i].iter().any(|m| m.name == marble.name) {
                return Err(SimError::config(format!(
                    "duplicate marble name {:?}",
                    marble.name
                )));
            }
        }
        if self.marble(&self.var).is_none() {
            return Err(SimError::config(format!(
                "unknown var body {:?}",
                self.var
            )));
        }
        if self.marble(&self.target).is_none() {
            return Err(SimError::config(format!(
                "unknown target body {:?}",
                self.target
            )));
        }

        let layout = self.layout.clone().unwrap_or_else(LayoutSpec::standard);
        let exit = layout.exit.rect();
        if exit.is_degenerate() {
            return Err(SimError::config("exit region has zero area"));
        }
        let walls: Vec<(&str, Rect)> = layout
            .walls
            .iter()
            .chain(self.extra_walls.iter())
            .map(|w| (w.name.as_str(), w.rect()))
            .collect();
        for (name, rect) in &walls {
            if rect.is_degenerate() {
                return Err(SimError::config(format!("wall {name:?} has zero area")));
            }
            if rect.overlaps_interior(&exit) {
                return Err(SimError::config(format!(
                    "wall {name:?} overlaps the exit region"
                )));
            }
        }
        for i in 0..walls.len() {
            for j in (i + 1)..walls.len() {
                if walls[i].1.overlaps_interior(&walls[j].1) {
                    return Err(SimError::config(format!(
                        "walls {:?} and {:?} overlap",
                        walls[i].0, walls[j].0
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Load an ordered list of trial records from a JSON file.
pub fn load_trials(path: impl AsRef<Path>) -> SimResult<Vec<TrialSpec>> {
    let content = std::fs::read_to_string(path)?;
    let trials: Vec<TrialSpec> = serde_json::from_str(&content)?;
    for trial in &trials {
        trial.validate()?;
    }
    Ok(trials)
}
