use glam::Mat4;

/// Camera data block attached to a scene node.
///
/// Only the projection and lens parameters live here; placement comes from
/// the owning node's transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub projection_type: ProjectionType,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub ortho_size: f32,
    /// Horizontal lens shift in frame widths.
    pub shift_x: f32,
    /// Vertical lens shift in frame heights.
    pub shift_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    Perspective,
    Orthographic,
}

impl Camera {
    /// `fov` is the vertical field of view in degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            projection_type: ProjectionType::Perspective,
            fov: fov.to_radians(),
            aspect,
            near,
            far,
            ortho_size: 10.0,
            shift_x: 0.0,
            shift_y: 0.0,
        }
    }

    /// Horizontal field of view in radians.
    #[must_use]
    pub fn horizontal_fov(&self) -> f32 {
        2.0 * ((self.fov * 0.5).tan() * self.aspect).atan()
    }

    /// Half of the narrower field of view; the angle an object must fit in to
    /// be fully visible.
    #[must_use]
    pub fn limiting_half_fov(&self) -> f32 {
        (self.fov.min(self.horizontal_fov())) * 0.5
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection_type {
            ProjectionType::Perspective => {
                let proj = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
                // lens shift offsets the frustum in NDC (2 units per frame)
                Mat4::from_translation(glam::Vec3::new(-2.0 * self.shift_x, -2.0 * self.shift_y, 0.0))
                    * proj
            }
            ProjectionType::Orthographic => {
                let h = self.ortho_size;
                let w = h * self.aspect;
                Mat4::orthographic_rh(-w, w, -h, h, self.near, self.far)
            }
        }
    }

    /// Copies the rendering-relevant data of `base` onto `self`.
    ///
    /// Lens shift belongs to the rig layout (stereo children carry their own
    /// off-axis shift) and is preserved.
    pub fn copy_render_properties(&mut self, base: &Camera) {
        let (shift_x, shift_y) = (self.shift_x, self.shift_y);
        *self = base.clone();
        self.shift_x = shift_x;
        self.shift_y = shift_y;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new_perspective(39.6, 16.0 / 9.0, 0.1, 1000.0)
    }
}
