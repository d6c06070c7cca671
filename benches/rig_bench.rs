use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use multicam::render::{FrameRange, RenderQueue};
use multicam::rig::{MatrixParams, RigGenerator, RigSettings, sphere};
use multicam::scene::{Camera, Scene};

// ---------------------------------------------------------------------------
// Layouts
// ---------------------------------------------------------------------------

fn bench_fibonacci_lattice(c: &mut Criterion) {
    c.bench_function("fibonacci_lattice_256", |b| {
        b.iter(|| sphere::fibonacci_lattice(black_box(256)));
    });
}

// ---------------------------------------------------------------------------
// Regeneration against the in-memory scene
// ---------------------------------------------------------------------------

fn bench_regenerate_matrix(c: &mut Criterion) {
    let mut scene = Scene::new();
    let base = scene.add_camera("Camera", Camera::default());
    let settings = RigSettings::matrix(MatrixParams {
        h_amount: 8,
        v_amount: 8,
        h_distance: 100,
        v_distance: 100,
    });

    c.bench_function("regenerate_matrix_8x8", |b| {
        b.iter(|| {
            let mut generator = RigGenerator::new(&mut scene);
            black_box(generator.on_parameter_changed(base, settings))
        });
    });
}

// ---------------------------------------------------------------------------
// Queue construction
// ---------------------------------------------------------------------------

fn bench_queue_frame_by_frame(c: &mut Criterion) {
    let cameras: Vec<String> = (0..16).map(|i| format!("Camera_{i}")).collect();

    c.bench_function("queue_frame_by_frame_16x250", |b| {
        b.iter(|| RenderQueue::build(cameras.iter().cloned(), black_box(FrameRange::new(1, 250)), true));
    });
}

criterion_group!(layouts, bench_fibonacci_lattice);
criterion_group!(regeneration, bench_regenerate_matrix);
criterion_group!(queue, bench_queue_frame_by_frame);
criterion_main!(layouts, regeneration, queue);
