//! Fixed timestep advance: release, integrate, exit latch, resolve collisions.

use crate::consts::SIM_DT;
use crate::rng::TrialRng;

use super::collision::{circle_circle_collision, circle_rect_collision, reflect_velocity};
use super::noise::{NoiseSpec, maybe_perturb};
use super::scene::{ContactEvent, Scene};

/// Advance the scene by one fixed timestep.
///
/// Order within a tick: delayed release (with the one-shot noise injection),
/// integration, exit test, then collision resolution. The exit test runs
/// before collisions are resolved, so a marble overlapping both the opening
/// and a wall edge in the same tick counts as passed; the latch is sticky and
/// cannot be retracted by the position correction that follows.
pub fn step(scene: &mut Scene, mut noise: Option<(&NoiseSpec, &mut TrialRng)>) {
    let tick = scene.tick;

    // Release and integrate
    for marble in &mut scene.marbles {
        if tick == marble.delay {
            marble.vel = marble.launch_vel * scene.speed_scale;
        }
        if let Some((spec, rng)) = noise.as_mut() {
            maybe_perturb(marble, tick, spec, rng);
        }
        marble.pos += marble.vel * SIM_DT;
    }

    // Exit latch
    for marble in &mut scene.marbles {
        if !marble.passed_exit && scene.exit.reached(marble.pos, marble.radius) {
            marble.passed_exit = true;
        }
    }

    resolve_marble_contacts(scene, tick);
    resolve_wall_contacts(scene, tick);

    scene.tick = tick + 1;
}

/// Pairwise circle-circle resolution over all marbles. Equal-mass impulse
/// along the contact normal, restitution = product of the pair's
/// coefficients; positions are separated half-and-half along the normal.
fn resolve_marble_contacts(scene: &mut Scene, tick: u32) {
    let count = scene.marbles.len();
    for i in 0..count {
        for j in (i + 1)..count {
            let (left, right) = scene.marbles.split_at_mut(j);
            let a = &mut left[i];
            let b = &mut right[0];

            let contact = circle_circle_collision(a.pos, a.radius, b.pos, b.radius);
            if !contact.hit {
                continue;
            }

            let push = contact.normal * (contact.penetration * 0.5);
            a.pos += push;
            b.pos -= push;

            let closing = (a.vel - b.vel).dot(contact.normal);
            if closing < 0.0 {
                let restitution = a.restitution * b.restitution;
                let impulse = -(1.0 + restitution) * closing * 0.5;
                a.vel += contact.normal * impulse;
                b.vel -= contact.normal * impulse;
            }

            scene.events.collisions.push(ContactEvent {
                a: a.name.clone(),
                b: b.name.clone(),
                tick,
            });
        }
    }
}

/// Circle-vs-wall resolution for every marble. Walls are immovable; the
/// marble's own restitution scales the reflected normal component.
fn resolve_wall_contacts(scene: &mut Scene, tick: u32) {
    for marble in &mut scene.marbles {
        for wall in &scene.walls {
            let contact = circle_rect_collision(marble.pos, marble.radius, &wall.rect);
            if !contact.hit {
                continue;
            }

            marble.pos += contact.normal * contact.penetration;
            if marble.vel.dot(contact.normal) < 0.0 {
                marble.vel = reflect_velocity(marble.vel, contact.normal, marble.restitution);
            }

            scene.events.wall_bounces.push(ContactEvent {
                a: marble.name.clone(),
                b: wall.name.clone(),
                tick,
            });
        }
    }
}
