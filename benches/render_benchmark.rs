#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmark for frame rendering and encoding.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use walkbars::output::{GifEncoder, GifOptions, PngEncoder};
use walkbars::plots::BarChart;

fn bar_values(count: usize) -> Vec<f64> {
    (0..count).map(|i| (i as f64 * 0.37).sin().abs()).collect()
}

fn bar_chart_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("bar_chart");

    for (width, height) in [(320, 240), (640, 480), (1280, 960)] {
        let chart = BarChart::new()
            .values(&bar_values(5))
            .title("Frame 0:01.0")
            .dimensions(width, height)
            .build()
            .expect("chart should build");

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &chart,
            |b, chart| {
                b.iter(|| black_box(chart).to_framebuffer().expect("render should succeed"));
            },
        );
    }

    group.finish();
}

fn encoder_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoder");

    let frames: Vec<_> = (0..10)
        .map(|i| {
            let values: Vec<f64> =
                bar_values(5).iter().map(|v| (v + i as f64 * 0.05) % 1.0).collect();
            BarChart::new()
                .values(&values)
                .dimensions(640, 480)
                .build()
                .and_then(|chart| chart.to_framebuffer())
                .expect("render should succeed")
        })
        .collect();

    group.bench_function("png_frame", |b| {
        b.iter(|| PngEncoder::to_bytes(black_box(&frames[0])).expect("encoding should succeed"));
    });

    group.sample_size(10);
    group.bench_function("gif_10_frames", |b| {
        b.iter(|| {
            GifEncoder::to_bytes(black_box(&frames), GifOptions::default())
                .expect("encoding should succeed")
        });
    });

    group.finish();
}

criterion_group!(benches, bar_chart_benchmark, encoder_benchmark);
criterion_main!(benches);
