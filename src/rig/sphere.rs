//! Spherical camera cover using a Fibonacci lattice.
//!
//! Sampling latitude and longitude uniformly bunches cameras up at the poles.
//! The golden-angle spiral instead advances the azimuth by a fixed irrational
//! turn per sample while stepping height uniformly, which spreads the points
//! with near-uniform angular spacing.

use std::f32::consts::PI;

use glam::Vec3;

use crate::math;
use crate::rig::{ChildSpec, RigTarget};

/// Azimuth increment between consecutive samples: `π(√5 − 1)`.
#[must_use]
pub fn golden_angle() -> f32 {
    PI * (5.0_f32.sqrt() - 1.0)
}

/// Sample `index` of `count` on the unit sphere. `count` must be at least 2.
#[must_use]
pub fn fibonacci_point(index: u32, count: u32) -> Vec3 {
    debug_assert!(count >= 2, "fibonacci lattice needs at least two samples");
    let y = 1.0 - 2.0 * index as f32 / (count - 1) as f32;
    let r = (1.0 - y * y).max(0.0).sqrt();
    let theta = golden_angle() * index as f32;
    Vec3::new(theta.cos() * r, y, theta.sin() * r)
}

/// All `count` lattice points on the unit sphere.
#[must_use]
pub fn fibonacci_lattice(count: u32) -> Vec<Vec3> {
    (0..count).map(|i| fibonacci_point(i, count)).collect()
}

/// `count` cameras on a sphere of `radius` around the target, each tracking it.
#[must_use]
pub fn layout(count: u32, radius: f32, target: RigTarget) -> Vec<ChildSpec> {
    (0..count)
        .map(|i| {
            let position = target.position + fibonacci_point(i, count) * radius;
            let rotation = math::look_rotation(target.position - position, math::WORLD_UP);
            ChildSpec::world(format!("_{i}"), position, rotation).looking_at(target.handle)
        })
        .collect()
}
