//! Scene Graph Tests
//!
//! Tests for:
//! - Scene: add/remove nodes, unique names, attach/detach hierarchy
//! - World matrices: parent chains, set_world_matrix, look-at constraints
//! - Camera data: copying, framing a target
//! - Rig bookkeeping: rig-child flag and base resolution

use std::f32::consts::FRAC_PI_2;

use glam::{Affine3A, Quat, Vec3};

use multicam::MulticamError;
use multicam::math;
use multicam::scene::{
    BoundingBox, Camera, LookAtConstraint, Node, Scene, SceneGraph, TrackAxis, Transform, UpAxis,
};

const EPSILON: f32 = 1e-4;

fn assert_vec3_near(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).length() < EPSILON,
        "expected {expected:?}, got {actual:?}"
    );
}

fn translation(m: Affine3A) -> Vec3 {
    Vec3::from(m.translation)
}

// ============================================================================
// Nodes & Names
// ============================================================================

#[test]
fn add_node_goes_to_root() {
    let mut scene = Scene::new();
    let handle = scene.add_node(Node::new("A"));
    assert!(scene.root_nodes.contains(&handle));
    assert_eq!(scene.name(handle), Some("A"));
    assert_eq!(scene.find_by_name("A").unwrap(), handle);
}

#[test]
fn taken_names_get_a_suffix() {
    let mut scene = Scene::new();
    scene.add_node(Node::new("Camera"));
    let second = scene.add_node(Node::new("Camera"));
    let third = scene.add_node(Node::new("Camera"));
    assert_eq!(scene.name(second), Some("Camera.001"));
    assert_eq!(scene.name(third), Some("Camera.002"));
}

#[test]
fn create_camera_refuses_taken_names() {
    let mut scene = Scene::new();
    scene.add_camera("Camera", Camera::default());
    let result = scene.create_camera("Camera", Camera::default());
    assert!(matches!(result, Err(MulticamError::DuplicateName(_))));
}

#[test]
fn rename_updates_lookup() {
    let mut scene = Scene::new();
    let handle = scene.add_node(Node::new("Old"));
    scene.set_name(handle, "New");
    assert!(scene.find_by_name("Old").is_err());
    assert_eq!(scene.find_by_name("New").unwrap(), handle);
}

#[test]
fn remove_node_removes_subtree() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("Parent"));
    let child = scene.add_to_parent(Node::new("Child"), parent);
    let grandchild = scene.add_to_parent(Node::new("Grandchild"), child);

    scene.destroy(parent);
    assert!(!scene.contains(parent));
    assert!(!scene.contains(child));
    assert!(!scene.contains(grandchild));
    assert!(scene.find_by_name("Grandchild").is_err());
    assert!(scene.is_empty());
}

#[test]
fn find_missing_name_is_not_found() {
    let scene = Scene::new();
    assert!(matches!(scene.find_by_name("Nope"), Err(MulticamError::NodeNotFound(_))));
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn link_and_unlink() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("Parent"));
    let child = scene.add_node(Node::new("Child"));

    scene.link(child, parent).unwrap();
    assert_eq!(scene.parent(child), Some(parent));
    assert_eq!(scene.children(parent), vec![child]);
    assert!(!scene.root_nodes.contains(&child));

    scene.unlink(child).unwrap();
    assert_eq!(scene.parent(child), None);
    assert!(scene.children(parent).is_empty());
    assert!(scene.root_nodes.contains(&child));
}

#[test]
fn attach_rejects_cycles() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new("A"));
    let b = scene.add_to_parent(Node::new("B"), a);

    scene.attach(a, b);
    assert_eq!(scene.parent(a), None);
    assert_eq!(scene.parent(b), Some(a));

    scene.attach(a, a);
    assert_eq!(scene.parent(a), None);
}

// ============================================================================
// World matrices
// ============================================================================

#[test]
fn world_matrix_follows_parent_chain() {
    let mut scene = Scene::new();
    let parent = scene
        .build_node("Parent")
        .with_transform(Transform::from_position_rotation(
            Vec3::new(10.0, 0.0, 0.0),
            Quat::from_rotation_z(FRAC_PI_2),
        ))
        .build();
    let child = scene
        .build_node("Child")
        .with_position(1.0, 0.0, 0.0)
        .with_parent(parent)
        .build();

    // +X in the parent is +Y in the world
    assert_vec3_near(translation(scene.world_matrix(child).unwrap()), Vec3::new(10.0, 1.0, 0.0));
}

#[test]
fn set_world_matrix_under_a_parent() {
    let mut scene = Scene::new();
    let parent = scene
        .build_node("Parent")
        .with_transform(Transform::from_position_rotation(
            Vec3::new(0.0, 5.0, 0.0),
            Quat::from_rotation_x(0.7),
        ))
        .build();
    let child = scene.build_node("Child").with_parent(parent).build();

    let world = Affine3A::from_rotation_translation(Quat::from_rotation_y(0.3), Vec3::new(1.0, 2.0, 3.0));
    scene.set_world_matrix(child, world).unwrap();

    let result = scene.world_matrix(child).unwrap();
    assert!(result.abs_diff_eq(world, EPSILON));
}

#[test]
fn transform_look_at_points_forward_axis() {
    let mut transform = Transform::new();
    transform.position = Vec3::new(1.0, 1.0, 0.0);
    transform.look_at(Vec3::new(1.0, 5.0, 0.0), Vec3::Z);
    assert_vec3_near(transform.forward(), Vec3::Y);

    // Looking at itself is a no-op
    let before = transform.rotation;
    transform.look_at(transform.position, Vec3::Z);
    assert_eq!(transform.rotation, before);
}

#[test]
fn look_at_constraint_overrides_rotation() {
    let mut scene = Scene::new();
    let target = scene.build_node("Target").with_position(0.0, 10.0, 0.0).build();
    let camera = scene
        .build_node("Camera")
        .with_camera(Camera::default())
        .with_position(0.0, 0.0, 0.0)
        .build();

    scene.add_look_at(camera, LookAtConstraint::track_to(target)).unwrap();
    let forward = scene
        .world_matrix(camera)
        .unwrap()
        .transform_vector3(math::CAMERA_FORWARD);
    assert_vec3_near(forward, Vec3::Y);

    // Image up stays on the world-up side
    let up = scene.world_matrix(camera).unwrap().transform_vector3(math::CAMERA_UP);
    assert!(up.z > 0.9);

    scene.clear_constraints(camera).unwrap();
    assert!(scene.constraints(camera).is_empty());
    let forward = scene
        .world_matrix(camera)
        .unwrap()
        .transform_vector3(math::CAMERA_FORWARD);
    assert_vec3_near(forward, Vec3::NEG_Z);
}

#[test]
fn mutually_tracking_nodes_do_not_recurse() {
    let mut scene = Scene::new();
    let a = scene.build_node("A").with_position(0.0, 0.0, 0.0).build();
    let b = scene.build_node("B").with_position(5.0, 0.0, 0.0).build();
    scene.add_look_at(a, LookAtConstraint::track_to(b)).unwrap();
    scene.add_look_at(b, LookAtConstraint::track_to(a)).unwrap();

    let a_forward = scene.world_matrix(a).unwrap().transform_vector3(math::CAMERA_FORWARD);
    let b_forward = scene.world_matrix(b).unwrap().transform_vector3(math::CAMERA_FORWARD);
    assert_vec3_near(a_forward, Vec3::X);
    assert_vec3_near(b_forward, Vec3::NEG_X);
}

#[test]
fn look_at_rejects_parallel_axes() {
    let mut scene = Scene::new();
    let camera = scene.add_camera("Camera", Camera::default());
    let target = scene.add_node(Node::new("Target"));

    let degenerate = LookAtConstraint {
        forward_axis: TrackAxis::NegY,
        up_axis: UpAxis::Y,
        ..LookAtConstraint::track_to(target)
    };
    let result = scene.add_look_at(camera, degenerate);
    assert!(matches!(result, Err(MulticamError::InvalidParameter { field: "up_axis", .. })));
    assert!(scene.constraints(camera).is_empty());
}

#[test]
fn look_at_needs_a_live_target() {
    let mut scene = Scene::new();
    let camera = scene.add_camera("Camera", Camera::default());
    let gone = scene.add_node(Node::new("Gone"));
    scene.destroy(gone);

    let result = scene.add_look_at(camera, LookAtConstraint::track_to(gone));
    assert!(matches!(result, Err(MulticamError::StaleHandle)));
}

// ============================================================================
// Camera data
// ============================================================================

#[test]
fn copy_camera_data_keeps_lens_shift() {
    let mut scene = Scene::new();
    let base = scene.add_camera("Base", Camera::new_perspective(50.0, 1.0, 0.2, 80.0));
    let mut shifted = Camera::default();
    shifted.shift_x = 0.05;
    let child = scene.add_camera("Child", shifted);

    scene.copy_camera_data(base, child).unwrap();
    let lens = scene.camera(child).unwrap();
    assert!((lens.fov - 50f32.to_radians()).abs() < EPSILON);
    assert!((lens.far - 80.0).abs() < EPSILON);
    assert!((lens.shift_x - 0.05).abs() < EPSILON);
}

#[test]
fn copy_camera_data_needs_cameras() {
    let mut scene = Scene::new();
    let base = scene.add_camera("Base", Camera::default());
    let empty = scene.add_node(Node::new("Empty"));
    assert!(matches!(
        scene.copy_camera_data(base, empty),
        Err(MulticamError::NotACamera(_))
    ));
}

#[test]
fn frame_in_view_fits_bounding_sphere() {
    let mut scene = Scene::new();
    let target = scene
        .build_node("Target")
        .with_position(0.0, 0.0, 2.0)
        .with_bounds(BoundingBox::from_center_size(Vec3::ZERO, Vec3::splat(2.0)))
        .build();
    let camera = scene.add_camera("Camera", Camera::new_perspective(60.0, 1.0, 0.1, 100.0));

    scene.frame_in_view(camera, target).unwrap();

    // Radius √3 seen through a 30° half angle
    let expected = 3f32.sqrt() / 30f32.to_radians().sin();
    let position = translation(scene.world_matrix(camera).unwrap());
    assert_vec3_near(position, Vec3::new(0.0, 0.0, 2.0 + expected));
}

#[test]
fn projection_shift_moves_image_center() {
    let mut lens = Camera::new_perspective(60.0, 1.0, 0.1, 100.0);
    lens.shift_x = 0.25;
    let clip = lens.projection_matrix() * glam::Vec4::new(0.0, 0.0, -10.0, 1.0);
    // Half a frame to the left in NDC
    assert!((clip.x / clip.w + 0.5).abs() < EPSILON);
}

// ============================================================================
// Rig bookkeeping
// ============================================================================

#[test]
fn rig_child_resolves_one_level_up() {
    let mut scene = Scene::new();
    let base = scene.add_camera("Base", Camera::default());
    let child = scene.add_camera("Base_L", Camera::default());
    scene.link(child, base).unwrap();

    // Plain children are their own base
    assert_eq!(scene.resolve_base(child), child);
    assert!(scene.rig_children(base).is_empty());

    scene.set_rig_child(child, true).unwrap();
    assert_eq!(scene.resolve_base(child), base);
    assert_eq!(scene.resolve_base(base), base);
    assert_eq!(scene.rig_children(base), vec![child]);
}
