//! # Emitter Benchmark
//!
//! Measures CPU-side integration throughput: how many attractor steps the
//! emitter can push into its ring buffer per frame, and how expensive the
//! palette ramp rebuild is.
//!
//! Run with: `cargo bench --bench emitter`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chaos_points::palettes::PaletteLibrary;
use chaos_points::{Attractor, AttractorKind, PointEmitter, TexturePrecision};

const STEPS: usize = 10_000;

fn bench_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit");
    group.throughput(Throughput::Elements(STEPS as u64));

    for kind in [AttractorKind::Lorenz, AttractorKind::Aizawa, AttractorKind::Pickover] {
        let attractor = Attractor::new(kind);
        let mut emitter = PointEmitter::new(1_000_000);
        emitter.restart(attractor.start);

        group.bench_with_input(BenchmarkId::from_parameter(attractor.name()), &attractor, |b, a| {
            b.iter(|| {
                if emitter.is_diverged() {
                    emitter.restart(a.start);
                }
                black_box(emitter.emit(a, STEPS))
            })
        });
    }
    group.finish();
}

fn bench_dirty_ranges(c: &mut Criterion) {
    let attractor = Attractor::new(AttractorKind::Thomas);
    let mut emitter = PointEmitter::new(4_096);
    emitter.restart(attractor.start);

    c.bench_function("wrap_and_take_dirty", |b| {
        b.iter(|| {
            emitter.emit(&attractor, 3_000);
            black_box(emitter.take_dirty())
        })
    });
}

fn bench_palette_texture(c: &mut Criterion) {
    let palettes = PaletteLibrary::default();
    let texture = palettes.current().to_texture().expect("built-in palette is not empty");

    c.bench_function("palette_to_bytes_f32", |b| {
        b.iter(|| black_box(texture.to_bytes(TexturePrecision::Float32)))
    });
}

criterion_group!(benches, bench_emit, bench_dirty_ranges, bench_palette_texture);
criterion_main!(benches);
