//! Host scene-graph interface.
//!
//! The rig generator and the render scheduler never touch a concrete scene;
//! they go through [`SceneGraph`], which exposes only the primitives they
//! need. [`Scene`](crate::scene::Scene) is the in-memory implementation used
//! for headless runs and tests; host integrations implement the trait over
//! their own object model.

use glam::Affine3A;

use crate::errors::Result;
use crate::rig::RigSettings;
use crate::scene::NodeHandle;
use crate::scene::camera::Camera;
use crate::scene::constraint::LookAtConstraint;
use crate::scene::transform::Transform;

pub trait SceneGraph {
    // ========================================================================
    // Entities
    // ========================================================================

    /// Creates a root-level camera node. Fails with `DuplicateName` when the
    /// name is taken.
    fn create_camera(&mut self, name: &str, camera: Camera) -> Result<NodeHandle>;

    /// Destroys a node and its whole subtree. Stale handles are ignored.
    fn destroy(&mut self, node: NodeHandle);

    fn contains(&self, node: NodeHandle) -> bool;

    /// Resolves a node by name. Fails with `NodeNotFound`.
    fn find_by_name(&self, name: &str) -> Result<NodeHandle>;

    fn name(&self, node: NodeHandle) -> Option<&str>;

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Parents `child` under `parent`, keeping its local transform.
    fn link(&mut self, child: NodeHandle, parent: NodeHandle) -> Result<()>;

    /// Moves `child` back to the scene root, keeping its local transform.
    fn unlink(&mut self, child: NodeHandle) -> Result<()>;

    fn parent(&self, node: NodeHandle) -> Option<NodeHandle>;

    fn children(&self, node: NodeHandle) -> Vec<NodeHandle>;

    // ========================================================================
    // Transforms
    // ========================================================================

    fn local_transform(&self, node: NodeHandle) -> Result<Transform>;

    fn set_local_transform(&mut self, node: NodeHandle, transform: Transform) -> Result<()>;

    /// World matrix with constraints evaluated.
    fn world_matrix(&self, node: NodeHandle) -> Result<Affine3A>;

    /// Sets the local transform so that the node ends up at `world`.
    fn set_world_matrix(&mut self, node: NodeHandle, world: Affine3A) -> Result<()>;

    // ========================================================================
    // Constraints
    // ========================================================================

    fn add_look_at(&mut self, node: NodeHandle, constraint: LookAtConstraint) -> Result<()>;

    fn clear_constraints(&mut self, node: NodeHandle) -> Result<()>;

    fn constraints(&self, node: NodeHandle) -> &[LookAtConstraint];

    // ========================================================================
    // Camera data
    // ========================================================================

    fn camera(&self, node: NodeHandle) -> Option<&Camera>;

    /// Copies the rendering-relevant camera data of `from` onto `to`.
    fn copy_camera_data(&mut self, from: NodeHandle, to: NodeHandle) -> Result<()>;

    /// Moves `camera` along its current view axis until `target` exactly fits
    /// in its field of view. Rotation is left untouched.
    fn frame_in_view(&mut self, camera: NodeHandle, target: NodeHandle) -> Result<()>;

    // ========================================================================
    // Rig data
    // ========================================================================

    fn rig_settings(&self, node: NodeHandle) -> Option<&RigSettings>;

    fn set_rig_settings(&mut self, node: NodeHandle, settings: RigSettings) -> Result<()>;

    fn is_rig_child(&self, node: NodeHandle) -> bool;

    fn set_rig_child(&mut self, node: NodeHandle, is_child: bool) -> Result<()>;

    /// The true base camera for `node`: rig children resolve one parent
    /// level up, anything else resolves to itself.
    fn resolve_base(&self, node: NodeHandle) -> NodeHandle {
        if self.is_rig_child(node)
            && let Some(parent) = self.parent(node)
        {
            return parent;
        }
        node
    }

    /// Rig children of `base`, in creation order.
    fn rig_children(&self, base: NodeHandle) -> Vec<NodeHandle> {
        self.children(base)
            .into_iter()
            .filter(|&c| self.is_rig_child(c))
            .collect()
    }
}
