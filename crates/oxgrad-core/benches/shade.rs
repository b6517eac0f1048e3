//! Shading Benchmarks
//!
//! Compares the stage pipeline against the vectorized program for the three
//! table layouts.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use oxgrad_core::{
    make_gradient, Builder, Color4f, GradientShader, GradientSpec, Interpolation, RasterPipeline,
    ShadeContext, StageRec, TileMode, Transform,
};

const ROW_WIDTH: usize = 1024;

fn specs() -> Vec<(&'static str, GradientSpec)> {
    let two = make_gradient(
        &[Color4f::RED, Color4f::BLUE],
        None,
        TileMode::Clamp,
        Interpolation::default(),
        None,
    )
    .unwrap();
    let even = make_gradient(
        &[Color4f::RED, Color4f::GREEN, Color4f::BLUE, Color4f::WHITE],
        None,
        TileMode::Mirror,
        Interpolation::default(),
        None,
    )
    .unwrap();
    let search = make_gradient(
        &[
            Color4f::RED,
            Color4f::GREEN,
            Color4f::new(0.0, 0.0, 1.0, 0.5),
            Color4f::BLACK,
            Color4f::WHITE,
        ],
        Some(&[0.0, 0.1, 0.1, 0.65, 1.0]),
        TileMode::Repeat,
        Interpolation::premul(),
        None,
    )
    .unwrap();
    vec![("two_stop", two), ("even", even), ("search", search)]
}

fn bench_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("shade_row");
    group.throughput(Throughput::Elements(ROW_WIDTH as u64));
    let ctx = ShadeContext::new();

    for (name, spec) in specs() {
        let shader = GradientShader::horizontal(Arc::new(spec), 0.0, ROW_WIDTH as f32 / 3.0);

        let mut pipeline = RasterPipeline::new();
        assert!(shader.append_stages(&mut StageRec::new(&mut pipeline, &ctx)));
        group.bench_with_input(BenchmarkId::new("stages", name), &pipeline, |b, p| {
            b.iter(|| p.shade_row(black_box(0), black_box(0), ROW_WIDTH))
        });

        let mut builder = Builder::new();
        let device = builder.device_coord();
        let color = shader.program(&mut builder, device, &ctx).unwrap();
        let program = builder.done(color);
        group.bench_with_input(BenchmarkId::new("program", name), &program, |b, p| {
            b.iter(|| p.shade_row(black_box(0), black_box(0), ROW_WIDTH))
        });
    }

    group.finish();
}

fn bench_table_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_build");
    let ctx = ShadeContext::new();

    for (name, spec) in specs() {
        let shader = GradientShader::new(Arc::new(spec), Transform::from_scale(0.01, 1.0));
        group.bench_function(name, |b| b.iter(|| shader.table(black_box(&ctx)).unwrap()));
    }

    group.finish();
}

criterion_group!(benches, bench_backends, bench_table_build);
criterion_main!(benches);
