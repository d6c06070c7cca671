//! Vector and rotation helpers shared by the rig layouts and the scene graph.
//!
//! The scene is Z-up. Cameras look down their local -Z axis with +Y as the
//! image "up" direction, so every look-at helper here builds rotations for that
//! convention unless an explicit axis pair is given.

use glam::{Mat3, Quat, Vec3};

/// World "up" used when orienting cameras toward a target.
pub const WORLD_UP: Vec3 = Vec3::Z;

/// Local axis a camera looks along.
pub const CAMERA_FORWARD: Vec3 = Vec3::NEG_Z;

/// Local axis that maps to the top of the camera image.
pub const CAMERA_UP: Vec3 = Vec3::Y;

const PARALLEL_EPSILON: f32 = 1e-6;

/// Builds a rotation from Euler angles in degrees, applied X first, then Y,
/// then Z about the fixed world axes.
#[must_use]
pub fn euler_deg(x: f32, y: f32, z: f32) -> Quat {
    Quat::from_rotation_z(z.to_radians())
        * Quat::from_rotation_y(y.to_radians())
        * Quat::from_rotation_x(x.to_radians())
}

/// Rotation that points the camera forward axis (-Z) along `forward` while
/// keeping its +Y axis as close to `up` as possible.
///
/// Returns identity for a zero-length `forward`. When `forward` is parallel
/// to `up` another world axis is used as the up hint.
#[must_use]
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    align_axes(CAMERA_FORWARD, CAMERA_UP, forward, up).unwrap_or(Quat::IDENTITY)
}

/// Rotation mapping `local_forward` onto `forward` and `local_up` toward `up`.
///
/// Both local axes must be unit length and perpendicular. Returns `None`
/// when `forward` has no usable direction.
#[must_use]
pub fn align_axes(local_forward: Vec3, local_up: Vec3, forward: Vec3, up: Vec3) -> Option<Quat> {
    let forward = forward.try_normalize()?;
    let up_hint = pick_up_hint(forward, up);

    let side = forward.cross(up_hint).normalize();
    let true_up = side.cross(forward).normalize();

    let local = Mat3::from_cols(local_forward, local_up, local_forward.cross(local_up));
    let world = Mat3::from_cols(forward, true_up, side);

    // local is orthonormal, so its transpose is its inverse
    Some(Quat::from_mat3(&(world * local.transpose())).normalize())
}

fn pick_up_hint(forward: Vec3, up: Vec3) -> Vec3 {
    let candidates = [up, Vec3::Y, Vec3::X];
    candidates
        .into_iter()
        .filter_map(Vec3::try_normalize)
        .find(|c| forward.cross(*c).length_squared() > PARALLEL_EPSILON)
        .unwrap_or(Vec3::Y)
}

/// Rotates `point` around `pivot` by `rotation`.
#[inline]
#[must_use]
pub fn rotate_about(point: Vec3, pivot: Vec3, rotation: Quat) -> Vec3 {
    pivot + rotation * (point - pivot)
}

/// Angle in radians between two directions. Zero-length inputs yield zero.
#[must_use]
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    match (a.try_normalize(), b.try_normalize()) {
        (Some(a), Some(b)) => a.dot(b).clamp(-1.0, 1.0).acos(),
        _ => 0.0,
    }
}

#[inline]
#[must_use]
pub fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() <= epsilon
}

#[inline]
#[must_use]
pub fn vec3_approx_eq(a: Vec3, b: Vec3, epsilon: f32) -> bool {
    a.abs_diff_eq(b, epsilon)
}
