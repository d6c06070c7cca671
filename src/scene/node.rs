use crate::rig::RigSettings;
use crate::scene::NodeHandle;
use crate::scene::bounds::BoundingBox;
use crate::scene::camera::Camera;
use crate::scene::constraint::LookAtConstraint;
use crate::scene::transform::Transform;

/// A scene node: hierarchy, local transform and the optional components the
/// rig system reads or writes.
///
/// # Hierarchy
///
/// - `parent`: handle of the parent node (`None` for root nodes)
/// - `children`: child handles in insertion order
///
/// # Rig data
///
/// - `rig`: rig settings, present on base cameras the user configured
/// - `is_rig_child`: set on every camera created by the rig generator
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) name: String,

    // === Core Hierarchy ===
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    // === Core Spatial Data ===
    pub transform: Transform,
    pub constraints: Vec<LookAtConstraint>,
    /// Local-space extent used when framing this node in a camera view.
    pub bounds: Option<BoundingBox>,

    // === Components ===
    pub camera: Option<Camera>,
    pub rig: Option<RigSettings>,
    pub is_rig_child: bool,
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            constraints: Vec::new(),
            bounds: None,
            camera: None,
            rig: None,
            is_rig_child: false,
        }
    }

    #[must_use]
    pub fn with_camera(name: &str, camera: Camera) -> Self {
        Self {
            camera: Some(camera),
            ..Self::new(name)
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn is_camera(&self) -> bool {
        self.camera.is_some()
    }
}
