use std::hint::black_box;
use std::time::Instant;

use glam::Mat4;
use orbitview_scene::{InstanceParams, InstanceTable, OrbitCamera};

fn bench_generate(count: usize, iterations: usize) {
    let params = InstanceParams::default();

    let start = Instant::now();
    for i in 0..iterations {
        black_box(InstanceTable::generate(count, black_box(i as u64), &params));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  generate ({count} instances, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_compose(count: usize, iterations: usize) {
    let table = InstanceTable::generate(count, 42, &InstanceParams::default());
    let mut camera = OrbitCamera::new(20.0, 1.0);
    camera.toggle_mode();

    let start = Instant::now();
    for _ in 0..iterations {
        camera.update(0.016);
        let vp = camera.projection_matrix(800.0 / 600.0) * camera.view_matrix();
        let mvps: Vec<Mat4> = table.matrices().iter().map(|m| vp * *m).collect();
        black_box(mvps);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  compose ({count} instances, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn main() {
    println!("=== instance table benchmarks ===");
    bench_generate(1_000, 200);
    bench_generate(10_000, 50);
    bench_compose(1_000, 500);
    bench_compose(10_000, 100);
}
