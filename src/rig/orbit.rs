//! Ring of cameras orbiting a target.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::math;
use crate::rig::{ChildSpec, RigTarget};

/// Parameters of a camera ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitRing {
    pub count: u32,
    pub radius: f32,
    /// Rotation of the first camera around the ring, in degrees.
    pub rotation_offset_deg: f32,
    pub tilt_x_deg: f32,
    pub tilt_y_deg: f32,
}

/// Angle of camera `index` of `count` on the untilted ring, in radians.
#[must_use]
pub fn ring_angle(index: u32, count: u32, rotation_offset_deg: f32) -> f32 {
    TAU * (index as f32 / count as f32 + rotation_offset_deg / 360.0)
}

/// Position of camera `index` relative to the target, tilt included.
#[must_use]
pub fn ring_offset(ring: &OrbitRing, index: u32) -> Vec3 {
    let angle = ring_angle(index, ring.count, ring.rotation_offset_deg);
    let flat = Vec3::new(angle.cos(), angle.sin(), 0.0) * ring.radius;
    math::euler_deg(ring.tilt_x_deg, ring.tilt_y_deg, 0.0) * flat
}

/// `count` cameras evenly spaced on a circle in the XY plane around the
/// target, the ring tilted as a whole, each camera tracking the target.
#[must_use]
pub fn layout(ring: &OrbitRing, target: RigTarget) -> Vec<ChildSpec> {
    (0..ring.count)
        .map(|i| {
            let position = target.position + ring_offset(ring, i);
            let rotation = math::look_rotation(target.position - position, math::WORLD_UP);
            ChildSpec::world(format!("_O{i}"), position, rotation).looking_at(target.handle)
        })
        .collect()
}
