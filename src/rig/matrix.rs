//! Rectangular camera grid (light-field matrix).

use glam::{Quat, Vec3};

use crate::rig::ChildSpec;
use crate::rig::params::MatrixParams;

/// Scene units per grid unit: grid distances are given in millimetres.
pub const GRID_UNIT_SCALE: f32 = 0.001;

/// Suffix of the camera at `row`, `col`.
#[must_use]
pub fn suffix(row: u32, col: u32) -> String {
    format!("_Y{row}_X{col}")
}

/// `h_amount × v_amount` cameras in the base camera's local XY plane, centred
/// on the base, all facing the base camera's direction.
///
/// Rows are emitted outer, columns inner; row 0 is the top row and column 0
/// the leftmost.
#[must_use]
pub fn layout(params: &MatrixParams) -> Vec<ChildSpec> {
    let dx = params.h_distance as f32 * GRID_UNIT_SCALE;
    let dy = params.v_distance as f32 * GRID_UNIT_SCALE;
    let x0 = -(params.h_amount.saturating_sub(1) as f32) * dx * 0.5;
    let y0 = (params.v_amount.saturating_sub(1) as f32) * dy * 0.5;

    let mut specs = Vec::with_capacity(params.camera_count());
    for row in 0..params.v_amount {
        for col in 0..params.h_amount {
            let position = Vec3::new(x0 + col as f32 * dx, y0 - row as f32 * dy, 0.0);
            specs.push(ChildSpec::local(suffix(row, col), position, Quat::IDENTITY));
        }
    }
    specs
}
