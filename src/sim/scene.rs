//! Scene model: marbles, walls, exit opening, and the per-trial contact log.
//!
//! A scene is built fresh from a trial record, owns everything it contains,
//! and is discarded once the outcome has been extracted. Marble order is
//! configuration order and defines update order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::config::{LayoutSpec, TrialSpec};
use crate::error::SimResult;

/// A circular dynamic body.
#[derive(Debug, Clone, PartialEq)]
pub struct Marble {
    /// Role tag from the configuration ("A", "B", "E", ...)
    pub name: String,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Configured launch velocity, applied scaled once `delay` elapses.
    pub launch_vel: Vec2,
    /// Ticks before the marble is released; velocity is zero until then.
    pub delay: u32,
    pub restitution: f32,
    /// Sticky flag set when the marble reaches the exit opening.
    pub passed_exit: bool,
}

/// Immovable box collider with infinite mass.
#[derive(Debug, Clone)]
pub struct Wall {
    pub name: String,
    pub rect: Rect,
}

/// The gated opening marbles may leave through.
///
/// The region occupies the gap and extends outward from the arena, so a
/// circle can only intersect it by actually entering the opening.
#[derive(Debug, Clone)]
pub struct ExitRegion {
    pub rect: Rect,
}

impl ExitRegion {
    pub fn center(&self) -> Vec2 {
        self.rect.center
    }

    /// Squared distance from a point to the exit center.
    pub fn center_dist_sq(&self, pos: Vec2) -> f32 {
        pos.distance_squared(self.rect.center)
    }

    /// Whether a marble's bounding circle has entered the opening.
    pub fn reached(&self, pos: Vec2, radius: f32) -> bool {
        self.rect.intersects_circle(pos, radius)
    }
}

/// One recorded contact, tagged with the tick it occurred on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub a: String,
    pub b: String,
    pub tick: u32,
}

impl ContactEvent {
    pub fn involves(&self, name: &str) -> bool {
        self.a == name || self.b == name
    }

    /// Whether this contact is between `x` and `y`, in either order.
    pub fn pair(&self, x: &str, y: &str) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }
}

/// Ordered contact log for one trial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneEvents {
    /// Marble-marble contacts
    pub collisions: Vec<ContactEvent>,
    /// Marble-wall contacts
    pub wall_bounces: Vec<ContactEvent>,
}

/// One trial's world: static geometry plus the ordered marble collection.
#[derive(Debug, Clone)]
pub struct Scene {
    pub walls: Vec<Wall>,
    pub exit: ExitRegion,
    pub marbles: Vec<Marble>,
    /// Scales configured launch velocities into world units per second.
    pub speed_scale: f32,
    pub tick: u32,
    pub events: SceneEvents,
}

impl Scene {
    /// Build a scene from a validated trial record.
    pub fn from_spec(spec: &TrialSpec) -> SimResult<Self> {
        spec.validate()?;

        let layout = spec.layout.clone().unwrap_or_else(LayoutSpec::standard);
        let walls = layout
            .walls
            .iter()
            .chain(spec.extra_walls.iter())
            .map(|w| Wall {
                name: w.name.clone(),
                rect: w.rect(),
            })
            .collect();
        let exit = ExitRegion {
            rect: layout.exit.rect(),
        };

        let marbles = spec
            .marbles
            .iter()
            .map(|m| Marble {
                name: m.name.clone(),
                pos: m.position,
                vel: Vec2::ZERO,
                radius: m.radius,
                launch_vel: m.velocity,
                delay: m.delay,
                restitution: m.restitution,
                passed_exit: false,
            })
            .collect();

        Ok(Self {
            walls,
            exit,
            marbles,
            speed_scale: spec.speed_scale,
            tick: 0,
            events: SceneEvents::default(),
        })
    }

    pub fn marble(&self, name: &str) -> Option<&Marble> {
        self.marbles.iter().find(|m| m.name == name)
    }

    pub fn marble_index(&self, name: &str) -> Option<usize> {
        self.marbles.iter().position(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarbleSpec;
    use crate::consts::*;

    fn two_marble_spec() -> TrialSpec {
        TrialSpec {
            name: "test".into(),
            marbles: vec![
                MarbleSpec {
                    name: "A".into(),
                    position: Vec2::new(400.0, 300.0),
                    velocity: Vec2::ZERO,
                    delay: 0,
                    radius: MARBLE_RADIUS,
                    restitution: 1.0,
                },
                MarbleSpec {
                    name: "E".into(),
                    position: Vec2::new(600.0, 300.0),
                    velocity: Vec2::new(-2.0, 0.0),
                    delay: 10,
                    radius: MARBLE_RADIUS,
                    restitution: 1.0,
                },
            ],
            extra_walls: vec![],
            var: "A".into(),
            target: "E".into(),
            layout: None,
            speed_scale: SPEED_SCALE,
        }
    }

    #[test]
    fn test_from_spec_builds_standard_layout() {
        let scene = Scene::from_spec(&two_marble_spec()).unwrap();
        assert_eq!(scene.walls.len(), 4);
        assert_eq!(scene.marbles.len(), 2);
        assert_eq!(scene.tick, 0);
        // Marbles start unreleased
        assert_eq!(scene.marbles[1].vel, Vec2::ZERO);
        assert_eq!(scene.exit.center(), Vec2::new(-EXIT_DEPTH / 2.0, WORLD_HEIGHT / 2.0));
    }

    #[test]
    fn test_marble_lookup_preserves_order() {
        let scene = Scene::from_spec(&two_marble_spec()).unwrap();
        assert_eq!(scene.marble_index("A"), Some(0));
        assert_eq!(scene.marble_index("E"), Some(1));
        assert_eq!(scene.marble_index("Q"), None);
    }

    #[test]
    fn test_exit_region_reached() {
        let scene = Scene::from_spec(&two_marble_spec()).unwrap();
        // Deep in the arena: not reached
        assert!(!scene.exit.reached(Vec2::new(400.0, 300.0), MARBLE_RADIUS));
        // Rolling along the left wall outside the gap: not reached
        assert!(!scene.exit.reached(Vec2::new(50.0, 500.0), MARBLE_RADIUS));
        // In the opening, poking past the boundary face
        assert!(scene.exit.reached(Vec2::new(20.0, 300.0), MARBLE_RADIUS));
    }

    #[test]
    fn test_contact_event_pair() {
        let event = ContactEvent {
            a: "A".into(),
            b: "E".into(),
            tick: 3,
        };
        assert!(event.pair("E", "A"));
        assert!(event.pair("A", "E"));
        assert!(!event.pair("A", "B"));
        assert!(event.involves("A"));
        assert!(!event.involves("B"));
    }
}
