use glam::{Affine3A, Vec3};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::errors::{MulticamError, Result};
use crate::math;
use crate::rig::RigSettings;
use crate::scene::NodeHandle;
use crate::scene::bounds::BoundingBox;
use crate::scene::camera::{Camera, ProjectionType};
use crate::scene::constraint::LookAtConstraint;
use crate::scene::graph::SceneGraph;
use crate::scene::node::Node;
use crate::scene::transform::Transform;

/// In-memory scene graph.
///
/// Nodes live in a slot map; names are unique and indexed so rig children and
/// queued cameras can be resolved by name. World matrices are evaluated on
/// demand from the parent chain, with look-at constraints applied per level.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,
    names: FxHashMap<String, NodeHandle>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts building a node.
    pub fn build_node(&'_ mut self, name: &str) -> NodeBuilder<'_> {
        NodeBuilder::new(self, name)
    }

    /// Adds a node at the scene root. A taken name gets a numeric suffix
    /// (`Name.001`, `Name.002`, ...).
    pub fn add_node(&mut self, mut node: Node) -> NodeHandle {
        node.name = self.unique_name(&node.name);
        node.parent = None;
        let name = node.name.clone();
        let handle = self.nodes.insert(node);
        self.names.insert(name, handle);
        self.root_nodes.push(handle);
        handle
    }

    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.add_node(child);
        self.attach(handle, parent);
        handle
    }

    /// Convenience: a root-level camera node.
    pub fn add_camera(&mut self, name: &str, camera: Camera) -> NodeHandle {
        self.add_node(Node::with_camera(name, camera))
    }

    /// Removes a node and its whole subtree.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        let Some(node) = self.nodes.get(handle) else {
            return;
        };
        let children = node.children.clone();
        for child in children {
            self.remove_node(child);
        }

        self.detach(handle);

        if let Some(node) = self.nodes.remove(handle) {
            self.names.remove(&node.name);
        }
    }

    /// Re-parents `child` under `parent`.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            log::error!("Node not found during attach!");
            return;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("Cannot attach node below its own descendant!");
            return;
        }

        self.detach(child);

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &Node)> {
        self.nodes.iter()
    }

    pub fn set_name(&mut self, handle: NodeHandle, name: &str) {
        if self.nodes.get(handle).is_some_and(|n| n.name == name) {
            return;
        }
        let name = self.unique_name(name);
        if let Some(node) = self.nodes.get_mut(handle) {
            self.names.remove(&node.name);
            node.name.clone_from(&name);
            self.names.insert(name, handle);
        }
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn node(&self, handle: NodeHandle) -> Result<&Node> {
        self.nodes.get(handle).ok_or(MulticamError::StaleHandle)
    }

    fn node_mut(&mut self, handle: NodeHandle) -> Result<&mut Node> {
        self.nodes.get_mut(handle).ok_or(MulticamError::StaleHandle)
    }

    fn unique_name(&self, base: &str) -> String {
        if !self.names.contains_key(base) {
            return base.to_owned();
        }
        (1..)
            .map(|i| format!("{base}.{i:03}"))
            .find(|candidate| !self.names.contains_key(candidate))
            .unwrap_or_else(|| base.to_owned())
    }

    fn detach(&mut self, child: NodeHandle) {
        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == child)
            {
                n.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == child) {
            self.root_nodes.remove(i);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = None;
        }
    }

    fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.nodes.get(p).and_then(|n| n.parent);
        }
        false
    }

    /// Parent chain of `handle`, root first, `handle` last.
    fn chain(&self, handle: NodeHandle) -> Result<Vec<NodeHandle>> {
        let mut chain = vec![handle];
        let mut current = self.node(handle)?.parent;
        while let Some(p) = current {
            chain.push(p);
            current = self.node(p)?.parent;
        }
        chain.reverse();
        Ok(chain)
    }

    /// World matrix ignoring constraints. Constraint targets are resolved
    /// against this so that mutually tracking nodes cannot recurse.
    fn raw_world_matrix(&self, handle: NodeHandle) -> Result<Affine3A> {
        self.chain(handle)?.into_iter().try_fold(Affine3A::IDENTITY, |world, h| {
            Ok(world * self.node(h)?.transform.local_matrix())
        })
    }

    fn apply_constraints(&self, node: &Node, world: Affine3A) -> Affine3A {
        if node.constraints.is_empty() {
            return world;
        }

        let (scale, mut rotation, position) = world.to_scale_rotation_translation();
        for c in &node.constraints {
            let Ok(target_world) = self.raw_world_matrix(c.target) else {
                continue;
            };
            let target = Vec3::from(target_world.translation);
            if let Some(q) = math::align_axes(
                c.forward_axis.to_vec3(),
                c.up_axis.to_vec3(),
                target - position,
                math::WORLD_UP,
            ) {
                rotation = q;
            }
        }
        Affine3A::from_scale_rotation_translation(scale, rotation, position)
    }

    fn world_bounds(&self, handle: NodeHandle) -> Result<BoundingBox> {
        let world = self.world_matrix(handle)?;
        let local = self.node(handle)?.bounds.unwrap_or_default();
        Ok(local.transform(&world))
    }
}

impl SceneGraph for Scene {
    fn create_camera(&mut self, name: &str, camera: Camera) -> Result<NodeHandle> {
        if self.names.contains_key(name) {
            return Err(MulticamError::DuplicateName(name.to_owned()));
        }
        Ok(self.add_camera(name, camera))
    }

    fn destroy(&mut self, node: NodeHandle) {
        self.remove_node(node);
    }

    fn contains(&self, node: NodeHandle) -> bool {
        self.nodes.contains_key(node)
    }

    fn find_by_name(&self, name: &str) -> Result<NodeHandle> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| MulticamError::NodeNotFound(name.to_owned()))
    }

    fn name(&self, node: NodeHandle) -> Option<&str> {
        self.nodes.get(node).map(Node::name)
    }

    fn link(&mut self, child: NodeHandle, parent: NodeHandle) -> Result<()> {
        self.node(child)?;
        self.node(parent)?;
        self.attach(child, parent);
        Ok(())
    }

    fn unlink(&mut self, child: NodeHandle) -> Result<()> {
        self.node(child)?;
        self.detach(child);
        self.root_nodes.push(child);
        Ok(())
    }

    fn parent(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeHandle) -> Vec<NodeHandle> {
        self.nodes
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn local_transform(&self, node: NodeHandle) -> Result<Transform> {
        Ok(self.node(node)?.transform)
    }

    fn set_local_transform(&mut self, node: NodeHandle, transform: Transform) -> Result<()> {
        self.node_mut(node)?.transform = transform;
        Ok(())
    }

    fn world_matrix(&self, node: NodeHandle) -> Result<Affine3A> {
        self.chain(node)?.into_iter().try_fold(Affine3A::IDENTITY, |parent_world, h| {
            let n = self.node(h)?;
            Ok(self.apply_constraints(n, parent_world * n.transform.local_matrix()))
        })
    }

    fn set_world_matrix(&mut self, node: NodeHandle, world: Affine3A) -> Result<()> {
        let parent_world = match self.node(node)?.parent {
            Some(p) => self.world_matrix(p)?,
            None => Affine3A::IDENTITY,
        };
        let local = parent_world.inverse() * world;
        self.node_mut(node)?.transform.apply_local_matrix(local);
        Ok(())
    }

    fn add_look_at(&mut self, node: NodeHandle, constraint: LookAtConstraint) -> Result<()> {
        if !constraint.is_valid() {
            return Err(MulticamError::InvalidParameter {
                field: "up_axis",
                reason: format!(
                    "{:?} is not perpendicular to the tracking axis {:?}",
                    constraint.up_axis, constraint.forward_axis
                ),
            });
        }
        self.node(constraint.target)?;
        self.node_mut(node)?.constraints.push(constraint);
        Ok(())
    }

    fn clear_constraints(&mut self, node: NodeHandle) -> Result<()> {
        self.node_mut(node)?.constraints.clear();
        Ok(())
    }

    fn constraints(&self, node: NodeHandle) -> &[LookAtConstraint] {
        self.nodes
            .get(node)
            .map_or(&[], |n| n.constraints.as_slice())
    }

    fn camera(&self, node: NodeHandle) -> Option<&Camera> {
        self.nodes.get(node).and_then(|n| n.camera.as_ref())
    }

    fn copy_camera_data(&mut self, from: NodeHandle, to: NodeHandle) -> Result<()> {
        let source = self.node(from)?;
        let base = source
            .camera
            .clone()
            .ok_or_else(|| MulticamError::NotACamera(source.name.clone()))?;

        let target = self.node_mut(to)?;
        match target.camera.as_mut() {
            Some(camera) => camera.copy_render_properties(&base),
            None => return Err(MulticamError::NotACamera(target.name.clone())),
        }
        Ok(())
    }

    fn frame_in_view(&mut self, camera: NodeHandle, target: NodeHandle) -> Result<()> {
        let cam_node = self.node(camera)?;
        let lens = cam_node
            .camera
            .clone()
            .ok_or_else(|| MulticamError::NotACamera(cam_node.name.clone()))?;

        let bounds = self.world_bounds(target)?;
        let radius = bounds.bounding_radius();

        let (scale, rotation, _) = self.world_matrix(camera)?.to_scale_rotation_translation();
        let forward = rotation * math::CAMERA_FORWARD;

        let distance = match lens.projection_type {
            ProjectionType::Perspective => {
                let sin = lens.limiting_half_fov().sin().max(f32::EPSILON);
                radius / sin
            }
            ProjectionType::Orthographic => radius + lens.near,
        };

        let position = bounds.center() - forward * distance;
        log::debug!(
            "framing {} at distance {distance:.3} (radius {radius:.3})",
            self.node(camera)?.name
        );
        self.set_world_matrix(
            camera,
            Affine3A::from_scale_rotation_translation(scale, rotation, position),
        )
    }

    fn rig_settings(&self, node: NodeHandle) -> Option<&RigSettings> {
        self.nodes.get(node).and_then(|n| n.rig.as_ref())
    }

    fn set_rig_settings(&mut self, node: NodeHandle, settings: RigSettings) -> Result<()> {
        self.node_mut(node)?.rig = Some(settings);
        Ok(())
    }

    fn is_rig_child(&self, node: NodeHandle) -> bool {
        self.nodes.get(node).is_some_and(|n| n.is_rig_child)
    }

    fn set_rig_child(&mut self, node: NodeHandle, is_child: bool) -> Result<()> {
        self.node_mut(node)?.is_rig_child = is_child;
        Ok(())
    }
}

/// Chained construction of a node.
pub struct NodeBuilder<'a> {
    scene: &'a mut Scene,
    node: Node,
    parent: Option<NodeHandle>,
}

impl<'a> NodeBuilder<'a> {
    pub fn new(scene: &'a mut Scene, name: &str) -> Self {
        Self {
            scene,
            node: Node::new(name),
            parent: None,
        }
    }

    #[must_use]
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.node.transform.position = Vec3::new(x, y, z);
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.node.transform = transform;
        self
    }

    #[must_use]
    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.node.camera = Some(camera);
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.node.bounds = Some(bounds);
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: NodeHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Inserts the node and returns its handle.
    pub fn build(self) -> NodeHandle {
        let handle = self.scene.add_node(self.node);
        if let Some(parent) = self.parent {
            self.scene.attach(handle, parent);
        }
        handle
    }
}
