//! Criterion benchmarks for the column raycaster.
//!
//! Benchmarks:
//!   - HeightField::sample at in-range and negative (wrapped) coordinates
//!   - full frame render at 320x200 and 640x400
//!
//! Run with: cargo bench -p voxel-renderer --bench raycast_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec2;

use voxel_renderer::{ColumnRaycaster, FrameBuffer, HeightField, Observer, ObserverConfig, RaycastConfig, TerrainSample};

fn terrain() -> HeightField {
    HeightField::from_fn(512, 512, |x, y| {
        let h = ((x * 7 + y * 3) % 64 + (x / 32 + y / 32) * 5) % 256;
        TerrainSample::new(40 + (h / 2) as u8, 90, 30, h as u8)
    })
    .expect("non-empty terrain")
}

// ---------------------------------------------------------------------------
// Benchmark: heightfield sampling
// ---------------------------------------------------------------------------

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("heightfield_sample");
    let field = terrain();

    group.bench_function("in_range", |b| {
        b.iter(|| black_box(field.sample(black_box(123.4), black_box(301.9))));
    });

    group.bench_function("wrapped_negative", |b| {
        b.iter(|| black_box(field.sample(black_box(-4123.4), black_box(-9301.9))));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: full frame
// ---------------------------------------------------------------------------

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("raycast_frame");
    group.sample_size(20);

    let field = terrain();
    let raycaster = ColumnRaycaster::new(RaycastConfig::default()).expect("valid config");
    let observer = Observer::new(Vec2::new(256.0, 256.0), 180.0, 6.0, 133.0, ObserverConfig::default());

    for &(w, h) in &[(320usize, 200usize), (640, 400)] {
        let mut frame = FrameBuffer::new(w, h).expect("non-empty frame");
        group.bench_function(format!("{}x{}", w, h), |b| {
            b.iter(|| {
                frame.clear();
                black_box(raycaster.render(&observer, &field, &mut frame))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sample, bench_frame);
criterion_main!(benches);
