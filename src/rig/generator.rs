//! Rig child lifecycle against a scene graph.
//!
//! Every regeneration destroys the complete child batch of a base camera and
//! builds a fresh one from the stored settings; nothing is diffed. All
//! validation, target lookup and name checks run before the old children are
//! touched, so a rejected change leaves the previous rig intact.

use glam::{Affine3A, Vec3};

use crate::errors::{MulticamError, Result};
use crate::rig::{self, ChildSpec, Placement, RigSettings, RigTarget, RigType};
use crate::scene::{Camera, LookAtConstraint, NodeHandle, SceneGraph, Transform};

/// Everything needed to build a rig, resolved up front.
struct RigPlan {
    base_name: String,
    lens: Camera,
    target: Option<RigTarget>,
    specs: Vec<ChildSpec>,
}

/// Creates, tags and destroys the child cameras of base cameras.
pub struct RigGenerator<'a, S: SceneGraph + ?Sized> {
    scene: &'a mut S,
}

impl<'a, S: SceneGraph + ?Sized> RigGenerator<'a, S> {
    pub fn new(scene: &'a mut S) -> Self {
        Self { scene }
    }

    /// Stores `settings` on the base camera of `camera` and rebuilds its rig.
    ///
    /// `camera` may be a rig child; it is resolved to its base first. The
    /// settings are stored only once the new children exist. If building
    /// fails after the old rig was torn down, the previous settings are
    /// rebuilt and the error is returned.
    pub fn on_parameter_changed(&mut self, camera: NodeHandle, settings: RigSettings) -> Result<Vec<NodeHandle>> {
        let base = self.resolve_base_camera(camera)?;
        let plan = self.plan(base, &settings)?;
        match self.apply(base, &settings, &plan) {
            Ok(children) => {
                self.scene.set_rig_settings(base, settings)?;
                Ok(children)
            }
            Err(e) => {
                self.restore_previous(base);
                Err(e)
            }
        }
    }

    fn restore_previous(&mut self, base: NodeHandle) {
        let Some(previous) = self.scene.rig_settings(base).copied() else {
            return;
        };
        let restored = self
            .plan(base, &previous)
            .and_then(|plan| self.apply(base, &previous, &plan));
        if let Err(e) = restored {
            log::warn!("could not rebuild the previous rig: {e}");
        }
    }

    /// Rebuilds the rig of `camera`'s base from its stored settings.
    pub fn regenerate(&mut self, camera: NodeHandle) -> Result<Vec<NodeHandle>> {
        let base = self.resolve_base_camera(camera)?;
        let settings = self.scene.rig_settings(base).copied().unwrap_or_default();
        let plan = self.plan(base, &settings)?;
        self.apply(base, &settings, &plan)
    }

    /// Destroys all rig children of `camera`'s base and clears the base's
    /// constraints. Returns the number of children removed.
    pub fn teardown(&mut self, camera: NodeHandle) -> Result<usize> {
        let base = self.resolve_base_camera(camera)?;
        Ok(self.teardown_base(base))
    }

    fn teardown_base(&mut self, base: NodeHandle) -> usize {
        let children = self.scene.rig_children(base);
        for &child in &children {
            self.scene.destroy(child);
        }
        if let Err(e) = self.scene.clear_constraints(base) {
            log::warn!("could not clear constraints on rig base: {e}");
        }
        children.len()
    }

    fn resolve_base_camera(&self, camera: NodeHandle) -> Result<NodeHandle> {
        if !self.scene.contains(camera) {
            return Err(MulticamError::StaleHandle);
        }
        let base = self.scene.resolve_base(camera);
        if self.scene.camera(base).is_none() {
            let name = self.scene.name(base).unwrap_or_default().to_owned();
            return Err(MulticamError::NotACamera(name));
        }
        Ok(base)
    }

    fn plan(&self, base: NodeHandle, settings: &RigSettings) -> Result<RigPlan> {
        settings.validate()?;

        let base_name = self.scene.name(base).unwrap_or_default().to_owned();
        let lens = self
            .scene
            .camera(base)
            .cloned()
            .ok_or_else(|| MulticamError::NotACamera(base_name.clone()))?;

        let target = match settings.rig_type {
            RigType::Mesh => Some(self.resolve_target(base, &base_name, settings)?),
            _ => None,
        };

        let specs = rig::generate(&base_name, settings, &lens, target)?;

        for spec in &specs {
            let name = spec.name_for(&base_name);
            if let Ok(existing) = self.scene.find_by_name(&name) {
                let ours = self.scene.is_rig_child(existing) && self.scene.parent(existing) == Some(base);
                if !ours {
                    return Err(MulticamError::DuplicateName(name));
                }
            }
        }

        Ok(RigPlan {
            base_name,
            lens,
            target,
            specs,
        })
    }

    fn resolve_target(&self, base: NodeHandle, base_name: &str, settings: &RigSettings) -> Result<RigTarget> {
        let handle = settings
            .mesh
            .target
            .filter(|&t| self.scene.contains(t))
            .ok_or_else(|| MulticamError::MissingTarget(base_name.to_owned()))?;

        if handle == base || self.inside_rig(base, handle) {
            return Err(MulticamError::InvalidParameter {
                field: "target",
                reason: String::from("a rig cannot target its own cameras or anything parented under them"),
            });
        }

        let position = Vec3::from(self.scene.world_matrix(handle)?.translation);
        Ok(RigTarget { handle, position })
    }

    /// Whether `node` is a rig child of `base` or lives in the subtree of one.
    /// Such nodes are destroyed by the next teardown.
    fn inside_rig(&self, base: NodeHandle, node: NodeHandle) -> bool {
        let mut current = Some(node);
        while let Some(handle) = current {
            let parent = self.scene.parent(handle);
            if parent == Some(base) && self.scene.is_rig_child(handle) {
                return true;
            }
            current = parent;
        }
        false
    }

    fn apply(&mut self, base: NodeHandle, settings: &RigSettings, plan: &RigPlan) -> Result<Vec<NodeHandle>> {
        let removed = self.teardown_base(base);

        match self.build_children(base, plan) {
            Ok(children) => {
                log::info!(
                    "rig {:?} on '{}': removed {removed}, created {} cameras",
                    settings.rig_type,
                    plan.base_name,
                    children.len()
                );
                Ok(children)
            }
            Err(e) => {
                log::error!("rig generation on '{}' failed: {e}", plan.base_name);
                self.teardown_base(base);
                Err(e)
            }
        }
    }

    fn build_children(&mut self, base: NodeHandle, plan: &RigPlan) -> Result<Vec<NodeHandle>> {
        let mut children = Vec::with_capacity(plan.specs.len());
        for spec in &plan.specs {
            let name = spec.name_for(&plan.base_name);

            let mut lens = plan.lens.clone();
            lens.shift_x += spec.lens_shift_x;

            let child = self.scene.create_camera(&name, lens)?;
            children.push(child);
            self.scene.set_rig_child(child, true)?;
            self.scene.link(child, base)?;

            match spec.placement {
                Placement::Local { position, rotation } => {
                    self.scene
                        .set_local_transform(child, Transform::from_position_rotation(position, rotation))?;
                }
                Placement::World { position, rotation } => {
                    self.scene
                        .set_world_matrix(child, Affine3A::from_rotation_translation(rotation, position))?;
                }
                Placement::Framed { rotation, target } => {
                    let anchor = plan.target.map_or(Vec3::ZERO, |t| t.position);
                    self.scene
                        .set_world_matrix(child, Affine3A::from_rotation_translation(rotation, anchor))?;
                    self.scene.frame_in_view(child, target)?;
                }
            }

            if let Some(target) = spec.look_at {
                self.scene.add_look_at(child, LookAtConstraint::track_to(target))?;
            }

            log::debug!("created rig camera '{name}'");
        }
        Ok(children)
    }
}
