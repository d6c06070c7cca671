//! Six-camera cube-face cover.

use glam::{Quat, Vec3};

use crate::math;
use crate::rig::ChildSpec;
use crate::scene::NodeHandle;

/// View directions of the six cameras: each camera sits on the opposite side
/// of the target and looks along its direction.
pub const FACE_VIEWS: [Vec3; 6] = [
    Vec3::NEG_X,
    Vec3::X,
    Vec3::NEG_Y,
    Vec3::Y,
    Vec3::NEG_Z,
    Vec3::Z,
];

/// Camera rotation looking along `view`. Vertical views keep +Y as image up.
#[must_use]
pub fn face_rotation(view: Vec3) -> Quat {
    let up = if view.cross(math::WORLD_UP).length_squared() < 1e-6 {
        Vec3::Y
    } else {
        math::WORLD_UP
    };
    math::look_rotation(view, up)
}

/// Orientation-only layout; positions come from framing the target.
#[must_use]
pub fn layout(z_rotation_offset_deg: f32, target: NodeHandle) -> Vec<ChildSpec> {
    let spin = Quat::from_rotation_z(z_rotation_offset_deg.to_radians());
    FACE_VIEWS
        .iter()
        .enumerate()
        .map(|(i, &view)| ChildSpec::framed(format!("_{i}"), spin * face_rotation(view), target))
        .collect()
}
