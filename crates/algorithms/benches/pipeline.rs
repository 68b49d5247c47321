//! Benchmarks for the rip current pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use riptide_algorithms::flow::{gradient_field, FlowVectorParams, GradientParams, RiskParams};
use riptide_algorithms::RipAnalysis;
use riptide_core::{GeoTransform, Raster, CRS};

fn create_bathymetry(size: usize) -> Raster<f64> {
    // Offshore slope with a noise-like ripple pattern
    let data = Array2::from_shape_fn((size, size), |(row, col)| {
        let base = (size - row) as f64 * 0.05;
        let variation = ((row * 7 + col * 13) % 100) as f64 / 100.0;
        base + variation
    });
    Raster::from_array(data)
        .with_transform(GeoTransform::new(583_000.0, 4_507_000.0, 1.0, -1.0))
        .with_crs(CRS::from_epsg(32618))
}

fn bench_gradient_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("gradient_field");

    for size in [256, 512, 1024].iter() {
        let depth = create_bathymetry(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| gradient_field(black_box(&depth), &GradientParams::default()).unwrap())
        });
    }

    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("rip_analysis");
    group.sample_size(20);

    for size in [256, 512].iter() {
        let depth = create_bathymetry(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let analysis = RipAnalysis::from_raster(black_box(&depth)).unwrap();
                let flow = analysis.flow_vectors(&FlowVectorParams::default()).unwrap();
                let risk = analysis.risk_zones(&RiskParams::default()).unwrap();
                (flow.metadata.total_vectors, risk.risk_zones.total())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_gradient_field, bench_full_pipeline);
criterion_main!(benches);
