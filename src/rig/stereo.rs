//! Stereo pair layout.
//!
//! Two cameras, `_L` and `_R`, sit at ∓`spacing / 2` on the base camera's
//! local X axis. A convergent rig toes both cameras in so their view axes
//! cross at `focal_distance` (the zero-parallax plane). A parallel rig keeps
//! the axes parallel and shifts the lenses instead, which converges the
//! frusta at the same plane without keystone distortion.

use glam::{Quat, Vec3};

use crate::rig::ChildSpec;
use crate::rig::params::StereoParams;
use crate::scene::Camera;

pub const LEFT_SUFFIX: &str = "_L";
pub const RIGHT_SUFFIX: &str = "_R";

/// Toe-in angle of each camera in radians; zero for parallel rigs.
#[must_use]
pub fn toe_in_angle(params: &StereoParams) -> f32 {
    if !params.is_convergent {
        return 0.0;
    }
    let half = params.spacing * 0.5;
    std::f32::consts::FRAC_PI_2 - (params.focal_distance / half).atan()
}

/// Horizontal lens shift of the left camera for a parallel rig, in frame
/// widths. The right camera uses the negated value.
#[must_use]
pub fn lens_shift(params: &StereoParams, lens: &Camera) -> f32 {
    if params.is_convergent {
        return 0.0;
    }
    let frame_width = 2.0 * params.focal_distance * (lens.horizontal_fov() * 0.5).tan();
    if frame_width <= f32::EPSILON {
        return 0.0;
    }
    (params.spacing * 0.5) / frame_width
}

#[must_use]
pub fn layout(params: &StereoParams, lens: &Camera) -> Vec<ChildSpec> {
    let half = params.spacing * 0.5;
    let theta = toe_in_angle(params);
    let shift = lens_shift(params, lens);

    vec![
        ChildSpec::local(LEFT_SUFFIX, Vec3::new(-half, 0.0, 0.0), Quat::from_rotation_y(-theta))
            .with_lens_shift(shift),
        ChildSpec::local(RIGHT_SUFFIX, Vec3::new(half, 0.0, 0.0), Quat::from_rotation_y(theta))
            .with_lens_shift(-shift),
    ]
}
