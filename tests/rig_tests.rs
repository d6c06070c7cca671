//! Rig Generation Tests
//!
//! Tests for:
//! - Stereo: spacing, convergence at the focal distance, off-axis lens shift
//! - Matrix: grid size, naming, spacing
//! - Mesh: orbit ring, Fibonacci sphere, six-face optimal cover
//! - Regeneration: idempotence, type switching, rejected changes

use std::collections::HashSet;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Quat, Vec3};

use multicam::MulticamError;
use multicam::math;
use multicam::rig::{
    self, MatrixParams, MeshLayout, MeshParams, RigGenerator, RigSettings, RigType, StereoParams, optimal, sphere, stereo,
};
use multicam::scene::{BoundingBox, Camera, LookAtConstraint, NodeHandle, Scene, SceneGraph, Transform};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn assert_vec3_near(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).length() < EPSILON,
        "expected {expected:?}, got {actual:?}"
    );
}

/// A camera away from the origin, looking along world +Y, with +Z up.
fn scene_with_camera() -> (Scene, NodeHandle) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut scene = Scene::new();
    let camera = scene
        .build_node("Camera")
        .with_transform(Transform::from_position_rotation(
            Vec3::new(1.0, -4.0, 2.0),
            Quat::from_rotation_x(FRAC_PI_2),
        ))
        .with_camera(Camera::default())
        .build();
    (scene, camera)
}

fn world_position(scene: &Scene, node: NodeHandle) -> Vec3 {
    Vec3::from(scene.world_matrix(node).unwrap().translation)
}

fn world_forward(scene: &Scene, node: NodeHandle) -> Vec3 {
    scene
        .world_matrix(node)
        .unwrap()
        .transform_vector3(math::CAMERA_FORWARD)
        .normalize()
}

fn child_names(scene: &Scene, base: NodeHandle) -> Vec<String> {
    scene
        .rig_children(base)
        .into_iter()
        .map(|c| scene.name(c).unwrap().to_owned())
        .collect()
}

fn apply(scene: &mut Scene, camera: NodeHandle, settings: RigSettings) -> Vec<NodeHandle> {
    RigGenerator::new(scene).on_parameter_changed(camera, settings).unwrap()
}

fn add_target(scene: &mut Scene, position: Vec3) -> NodeHandle {
    scene
        .build_node("Target")
        .with_position(position.x, position.y, position.z)
        .with_bounds(BoundingBox::unit())
        .build()
}

// ============================================================================
// Stereo
// ============================================================================

#[test]
fn stereo_children_are_spacing_apart() {
    let (mut scene, camera) = scene_with_camera();
    let children = apply(
        &mut scene,
        camera,
        RigSettings::stereo(StereoParams {
            is_convergent: false,
            focal_distance: 8.0,
            spacing: 0.065,
        }),
    );

    assert_eq!(children.len(), 2);
    assert_eq!(child_names(&scene, camera), vec!["Camera_L", "Camera_R"]);

    let left = world_position(&scene, children[0]);
    let right = world_position(&scene, children[1]);
    assert!(approx(left.distance(right), 0.065));

    // Midpoint is the base camera
    assert_vec3_near((left + right) * 0.5, world_position(&scene, camera));
}

#[test]
fn stereo_left_is_on_the_left() {
    let (mut scene, camera) = scene_with_camera();
    let children = apply(&mut scene, camera, RigSettings::stereo(StereoParams::default()));

    // The base looks along +Y with +Z up, so its right is +X.
    let left = world_position(&scene, children[0]);
    let right = world_position(&scene, children[1]);
    assert!(left.x < right.x);
}

#[test]
fn convergent_stereo_axes_meet_at_focal_distance() {
    let (mut scene, camera) = scene_with_camera();
    let params = StereoParams {
        is_convergent: true,
        focal_distance: 12.0,
        spacing: 0.5,
    };
    let children = apply(&mut scene, camera, RigSettings::stereo(params));

    let focus = world_position(&scene, camera) + world_forward(&scene, camera) * params.focal_distance;
    for &child in &children {
        let to_focus = (focus - world_position(&scene, child)).normalize();
        assert_vec3_near(world_forward(&scene, child), to_focus);
    }

    assert!(approx(
        world_position(&scene, children[0]).distance(world_position(&scene, children[1])),
        0.5
    ));
}

#[test]
fn convergent_stereo_has_no_lens_shift() {
    let (mut scene, camera) = scene_with_camera();
    let children = apply(
        &mut scene,
        camera,
        RigSettings::stereo(StereoParams {
            is_convergent: true,
            ..Default::default()
        }),
    );
    for child in children {
        assert!(approx(scene.camera(child).unwrap().shift_x, 0.0));
    }
}

#[test]
fn parallel_stereo_shifts_lenses_outward() {
    let (mut scene, camera) = scene_with_camera();
    let params = StereoParams {
        is_convergent: false,
        focal_distance: 5.0,
        spacing: 0.2,
    };
    let children = apply(&mut scene, camera, RigSettings::stereo(params));

    let lens = scene.camera(camera).unwrap().clone();
    let expected = 0.1 / (2.0 * 5.0 * (lens.horizontal_fov() * 0.5).tan());
    assert!(approx(stereo::lens_shift(&params, &lens), expected));

    assert!(approx(scene.camera(children[0]).unwrap().shift_x, expected));
    assert!(approx(scene.camera(children[1]).unwrap().shift_x, -expected));

    // Axes stay parallel to the base
    let base_forward = world_forward(&scene, camera);
    for &child in &children {
        assert_vec3_near(world_forward(&scene, child), base_forward);
    }
}

#[test]
fn stereo_children_inherit_base_lens() {
    let (mut scene, camera) = scene_with_camera();
    scene.get_node_mut(camera).unwrap().camera = Some(Camera::new_perspective(25.0, 1.5, 0.5, 300.0));

    let children = apply(&mut scene, camera, RigSettings::stereo(StereoParams::default()));
    let base = scene.camera(camera).unwrap().clone();
    for child in children {
        let lens = scene.camera(child).unwrap();
        assert!(approx(lens.fov, base.fov));
        assert!(approx(lens.near, 0.5));
        assert!(approx(lens.far, 300.0));
    }
}

// ============================================================================
// Matrix
// ============================================================================

#[test]
fn matrix_three_by_two_grid() {
    let (mut scene, camera) = scene_with_camera();
    let children = apply(
        &mut scene,
        camera,
        RigSettings::matrix(MatrixParams {
            h_amount: 3,
            v_amount: 2,
            h_distance: 100,
            v_distance: 50,
        }),
    );
    assert_eq!(children.len(), 6);

    let names: HashSet<String> = child_names(&scene, camera).into_iter().collect();
    assert_eq!(names.len(), 6);
    for row in 0..2 {
        for col in 0..3 {
            assert!(names.contains(&format!("Camera_Y{row}_X{col}")));
        }
    }

    let local = |name: &str| {
        let node = scene.find_by_name(name).unwrap();
        scene.local_transform(node).unwrap().position
    };

    // 100 mm columns, 50 mm rows, centred on the base, row 0 on top
    assert_vec3_near(local("Camera_Y0_X0"), Vec3::new(-0.1, 0.025, 0.0));
    assert_vec3_near(local("Camera_Y0_X1"), Vec3::new(0.0, 0.025, 0.0));
    assert_vec3_near(local("Camera_Y1_X2"), Vec3::new(0.1, -0.025, 0.0));

    let a = world_position(&scene, scene.find_by_name("Camera_Y0_X0").unwrap());
    let b = world_position(&scene, scene.find_by_name("Camera_Y0_X1").unwrap());
    let c = world_position(&scene, scene.find_by_name("Camera_Y1_X0").unwrap());
    assert!(approx(a.distance(b), 0.1));
    assert!(approx(a.distance(c), 0.05));
}

#[test]
fn matrix_children_face_base_direction() {
    let (mut scene, camera) = scene_with_camera();
    let children = apply(&mut scene, camera, RigSettings::matrix(MatrixParams::default()));
    let base_forward = world_forward(&scene, camera);
    for child in children {
        assert_vec3_near(world_forward(&scene, child), base_forward);
        assert!(scene.constraints(child).is_empty());
    }
}

// ============================================================================
// Orbit
// ============================================================================

#[test]
fn orbit_ring_around_target() {
    let (mut scene, camera) = scene_with_camera();
    let target_pos = Vec3::new(3.0, 2.0, 1.0);
    let target = add_target(&mut scene, target_pos);

    let children = apply(
        &mut scene,
        camera,
        RigSettings::mesh(MeshParams {
            target: Some(target),
            radius: 2.0,
            layout: MeshLayout::Orbit {
                count: 4,
                rotation_offset_deg: 0.0,
                tilt_x_deg: 0.0,
                tilt_y_deg: 0.0,
            },
        }),
    );
    assert_eq!(child_names(&scene, camera), vec!["Camera_O0", "Camera_O1", "Camera_O2", "Camera_O3"]);

    assert_vec3_near(world_position(&scene, children[0]), target_pos + Vec3::new(2.0, 0.0, 0.0));
    assert_vec3_near(world_position(&scene, children[1]), target_pos + Vec3::new(0.0, 2.0, 0.0));

    for &child in &children {
        let pos = world_position(&scene, child);
        assert!(approx(pos.distance(target_pos), 2.0));
        assert!(approx(pos.z, target_pos.z));
        assert_vec3_near(world_forward(&scene, child), (target_pos - pos).normalize());
        assert_eq!(scene.constraints(child).len(), 1);
        assert_eq!(scene.constraints(child)[0].target, target);
    }
}

#[test]
fn orbit_rotation_offset_and_tilt() {
    let (mut scene, camera) = scene_with_camera();
    let target = add_target(&mut scene, Vec3::ZERO);

    let children = apply(
        &mut scene,
        camera,
        RigSettings::mesh(MeshParams {
            target: Some(target),
            radius: 2.0,
            layout: MeshLayout::Orbit {
                count: 4,
                rotation_offset_deg: 90.0,
                tilt_x_deg: 30.0,
                tilt_y_deg: 0.0,
            },
        }),
    );

    // First camera starts a quarter turn in, then the ring tips 30° about X
    let expected = Quat::from_rotation_x(30f32.to_radians()) * Vec3::new(0.0, 2.0, 0.0);
    assert_vec3_near(world_position(&scene, children[0]), expected);
    assert!(approx(world_position(&scene, children[0]).z, 1.0));
}

#[test]
fn orbit_follows_moving_target() {
    let (mut scene, camera) = scene_with_camera();
    let target = add_target(&mut scene, Vec3::ZERO);
    let children = apply(
        &mut scene,
        camera,
        RigSettings::mesh(MeshParams {
            target: Some(target),
            ..Default::default()
        }),
    );

    scene.get_node_mut(target).unwrap().transform.position = Vec3::new(0.0, 0.0, 3.0);
    for child in children {
        let to_target = (Vec3::new(0.0, 0.0, 3.0) - world_position(&scene, child)).normalize();
        assert_vec3_near(world_forward(&scene, child), to_target);
    }
}

// ============================================================================
// Sphere
// ============================================================================

fn min_pairwise_angle(points: &[Vec3]) -> f32 {
    let mut min = PI;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            min = min.min(math::angle_between(*a, *b));
        }
    }
    min
}

#[test]
fn fibonacci_six_points_beat_naive_spiral() {
    let n = 6;
    let fibonacci = sphere::fibonacci_lattice(n);

    // Uniform latitude steps with uniform longitude steps
    let naive: Vec<Vec3> = (0..n)
        .map(|i| {
            let lat = PI * i as f32 / (n - 1) as f32;
            let lon = TAU * i as f32 / n as f32;
            Vec3::new(lat.sin() * lon.cos(), lat.cos(), lat.sin() * lon.sin())
        })
        .collect();

    assert!(min_pairwise_angle(&fibonacci) >= min_pairwise_angle(&naive));
}

#[test]
fn fibonacci_points_are_on_unit_sphere() {
    for p in sphere::fibonacci_lattice(32) {
        assert!(approx(p.length(), 1.0));
    }
    assert_vec3_near(sphere::fibonacci_point(0, 5), Vec3::Y);
    assert_vec3_near(sphere::fibonacci_point(4, 5), Vec3::NEG_Y);
}

#[test]
fn sphere_rig_surrounds_target() {
    let (mut scene, camera) = scene_with_camera();
    let target_pos = Vec3::new(-2.0, 5.0, 1.0);
    let target = add_target(&mut scene, target_pos);

    let children = apply(
        &mut scene,
        camera,
        RigSettings::mesh(MeshParams {
            target: Some(target),
            radius: 3.0,
            layout: MeshLayout::Sphere { count: 6 },
        }),
    );
    assert_eq!(children.len(), 6);
    assert_eq!(scene.name(children[5]), Some("Camera_5"));

    for &child in &children {
        let pos = world_position(&scene, child);
        assert!(approx(pos.distance(target_pos), 3.0));
        assert_vec3_near(world_forward(&scene, child), (target_pos - pos).normalize());
    }
}

// ============================================================================
// Optimal cover
// ============================================================================

#[test]
fn optimal_cover_frames_target_from_six_sides() {
    let (mut scene, camera) = scene_with_camera();
    let target_pos = Vec3::new(0.0, 10.0, 0.0);
    let target = add_target(&mut scene, target_pos);

    let children = apply(
        &mut scene,
        camera,
        RigSettings::mesh(MeshParams {
            target: Some(target),
            radius: 0.0,
            layout: MeshLayout::Optimal {
                z_rotation_offset_deg: 0.0,
            },
        }),
    );
    assert_eq!(children.len(), 6);

    let lens = scene.camera(camera).unwrap().clone();
    let radius = BoundingBox::unit().bounding_radius();
    let distance = radius / lens.limiting_half_fov().sin();

    for (i, &child) in children.iter().enumerate() {
        let view = optimal::FACE_VIEWS[i];
        assert_vec3_near(world_forward(&scene, child), view);
        assert_vec3_near(world_position(&scene, child), target_pos - view * distance);
        assert!(scene.constraints(child).is_empty());
    }
}

#[test]
fn optimal_cover_spins_about_vertical() {
    let (mut scene, camera) = scene_with_camera();
    let target = add_target(&mut scene, Vec3::ZERO);

    let children = apply(
        &mut scene,
        camera,
        RigSettings::mesh(MeshParams {
            target: Some(target),
            radius: 0.0,
            layout: MeshLayout::Optimal {
                z_rotation_offset_deg: 90.0,
            },
        }),
    );

    // -X view turned a quarter about +Z looks along -Y
    assert_vec3_near(world_forward(&scene, children[0]), Vec3::NEG_Y);
    // Vertical views keep looking straight up/down
    assert_vec3_near(world_forward(&scene, children[4]), Vec3::NEG_Z);
    assert_vec3_near(world_forward(&scene, children[5]), Vec3::Z);
}

// ============================================================================
// Regeneration
// ============================================================================

#[test]
fn regeneration_is_idempotent() {
    let (mut scene, camera) = scene_with_camera();
    let settings = RigSettings::matrix(MatrixParams {
        h_amount: 3,
        v_amount: 3,
        h_distance: 65,
        v_distance: 40,
    });

    let snapshot = |scene: &Scene| -> Vec<(String, [f32; 12])> {
        scene
            .rig_children(camera)
            .into_iter()
            .map(|c| {
                (
                    scene.name(c).unwrap().to_owned(),
                    scene.world_matrix(c).unwrap().to_cols_array(),
                )
            })
            .collect()
    };

    apply(&mut scene, camera, settings);
    let first = snapshot(&scene);
    apply(&mut scene, camera, settings);
    let second = snapshot(&scene);

    assert_eq!(first.len(), 9);
    assert_eq!(first.len(), second.len());
    for ((name_a, m_a), (name_b, m_b)) in first.iter().zip(&second) {
        assert_eq!(name_a, name_b);
        for (x, y) in m_a.iter().zip(m_b) {
            assert!(approx(*x, *y));
        }
    }
    // Base + 9 children, nothing left over from the first pass
    assert_eq!(scene.len(), 10);
}

#[test]
fn stereo_to_matrix_leaves_no_stereo_children() -> anyhow::Result<()> {
    let (mut scene, camera) = scene_with_camera();
    let target = add_target(&mut scene, Vec3::new(0.0, 5.0, 0.0));
    scene.add_look_at(camera, LookAtConstraint::track_to(target))?;
    apply(
        &mut scene,
        camera,
        RigSettings::stereo(StereoParams {
            is_convergent: true,
            ..Default::default()
        }),
    );
    assert!(scene.find_by_name("Camera_L").is_ok());

    assert_eq!(scene.constraints(camera).len(), 1);

    let stored = *scene.rig_settings(camera).unwrap();
    RigGenerator::new(&mut scene).on_parameter_changed(camera, stored.with_matrix(MatrixParams::default()))?;

    assert!(scene.find_by_name("Camera_L").is_err());
    assert!(scene.find_by_name("Camera_R").is_err());
    for name in child_names(&scene, camera) {
        assert!(!name.ends_with("_L") && !name.ends_with("_R"));
    }
    assert_eq!(scene.rig_children(camera).len(), 4);
    assert!(scene.constraints(camera).is_empty());

    // Switching keeps the stereo block for later
    let stored = scene.rig_settings(camera).unwrap();
    assert_eq!(stored.rig_type, RigType::Matrix);
    assert!(stored.stereo.is_convergent);
    Ok(())
}

#[test]
fn single_removes_all_children() {
    let (mut scene, camera) = scene_with_camera();
    apply(&mut scene, camera, RigSettings::matrix(MatrixParams::default()));
    assert_eq!(scene.rig_children(camera).len(), 4);

    let children = apply(&mut scene, camera, RigSettings::single());
    assert!(children.is_empty());
    assert!(scene.rig_children(camera).is_empty());
    assert_eq!(scene.len(), 1);
}

#[test]
fn rig_child_resolves_to_its_base() {
    let (mut scene, camera) = scene_with_camera();
    let children = apply(&mut scene, camera, RigSettings::stereo(StereoParams::default()));

    // Editing through a child rebuilds the base's rig
    let rebuilt = apply(&mut scene, children[0], RigSettings::matrix(MatrixParams::default()));
    assert_eq!(rebuilt.len(), 4);
    assert_eq!(scene.rig_settings(camera).unwrap().rig_type, RigType::Matrix);
    for child in rebuilt {
        assert_eq!(scene.parent(child), Some(camera));
    }
}

#[test]
fn regenerate_picks_up_lens_changes() {
    let (mut scene, camera) = scene_with_camera();
    apply(&mut scene, camera, RigSettings::stereo(StereoParams::default()));

    scene.get_node_mut(camera).unwrap().camera.as_mut().unwrap().far = 42.0;
    let children = RigGenerator::new(&mut scene).regenerate(camera).unwrap();

    for child in children {
        assert!(approx(scene.camera(child).unwrap().far, 42.0));
    }
}

#[test]
fn teardown_counts_removed_children() {
    let (mut scene, camera) = scene_with_camera();
    apply(&mut scene, camera, RigSettings::matrix(MatrixParams::default()));
    let removed = RigGenerator::new(&mut scene).teardown(camera).unwrap();
    assert_eq!(removed, 4);
    assert!(scene.rig_children(camera).is_empty());
}

// ============================================================================
// Rejected changes
// ============================================================================

#[test]
fn invalid_parameters_keep_previous_rig() {
    let (mut scene, camera) = scene_with_camera();
    apply(&mut scene, camera, RigSettings::stereo(StereoParams::default()));

    let result = RigGenerator::new(&mut scene).on_parameter_changed(
        camera,
        RigSettings::matrix(MatrixParams {
            h_amount: 1,
            ..Default::default()
        }),
    );
    assert!(matches!(
        result,
        Err(MulticamError::InvalidParameter { field: "h_amount", .. })
    ));

    assert_eq!(child_names(&scene, camera), vec!["Camera_L", "Camera_R"]);
    assert_eq!(scene.rig_settings(camera).unwrap().rig_type, RigType::Stereo);
}

#[test]
fn mesh_without_target_is_rejected() {
    let (mut scene, camera) = scene_with_camera();
    let result = RigGenerator::new(&mut scene).on_parameter_changed(camera, RigSettings::mesh(MeshParams::default()));
    assert!(matches!(result, Err(MulticamError::MissingTarget(name)) if name == "Camera"));
    assert!(scene.rig_children(camera).is_empty());
}

#[test]
fn mesh_layout_without_target_names_the_base() {
    let result = rig::generate("Camera", &RigSettings::mesh(MeshParams::default()), &Camera::default(), None);
    assert!(matches!(result, Err(MulticamError::MissingTarget(name)) if name == "Camera"));
}

#[test]
fn mesh_cannot_target_a_node_under_its_children() -> anyhow::Result<()> {
    let (mut scene, camera) = scene_with_camera();
    apply(&mut scene, camera, RigSettings::stereo(StereoParams::default()));
    let left = scene.find_by_name("Camera_L")?;
    let target = add_target(&mut scene, Vec3::new(0.0, 5.0, 0.0));
    scene.link(target, left)?;

    let result = RigGenerator::new(&mut scene).on_parameter_changed(
        camera,
        RigSettings::mesh(MeshParams {
            target: Some(target),
            ..Default::default()
        }),
    );
    assert!(matches!(result, Err(MulticamError::InvalidParameter { field: "target", .. })));

    // Previous rig, its settings and the target all survive
    assert!(scene.contains(target));
    assert_eq!(scene.parent(target), Some(left));
    assert_eq!(child_names(&scene, camera), vec!["Camera_L", "Camera_R"]);
    assert_eq!(scene.rig_settings(camera).map(|s| s.rig_type), Some(RigType::Stereo));
    Ok(())
}

#[test]
fn mesh_cannot_target_its_own_base() {
    let (mut scene, camera) = scene_with_camera();
    let result = RigGenerator::new(&mut scene).on_parameter_changed(
        camera,
        RigSettings::mesh(MeshParams {
            target: Some(camera),
            ..Default::default()
        }),
    );
    assert!(matches!(result, Err(MulticamError::InvalidParameter { field: "target", .. })));
}

#[test]
fn foreign_node_with_child_name_blocks_generation() {
    let (mut scene, camera) = scene_with_camera();
    scene.add_camera("Camera_R", Camera::default());

    let result = RigGenerator::new(&mut scene).on_parameter_changed(camera, RigSettings::stereo(StereoParams::default()));
    assert!(matches!(result, Err(MulticamError::DuplicateName(name)) if name == "Camera_R"));
    assert!(scene.rig_children(camera).is_empty());
    assert!(scene.find_by_name("Camera_L").is_err());
}

#[test]
fn non_camera_base_is_rejected() {
    let mut scene = Scene::new();
    let empty = scene.build_node("Empty").build();
    let result = RigGenerator::new(&mut scene).on_parameter_changed(empty, RigSettings::stereo(StereoParams::default()));
    assert!(matches!(result, Err(MulticamError::NotACamera(_))));
}
