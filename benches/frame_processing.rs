use std::time::Instant;

use camviewer_rs::camera_pipeline::processing::transform;
use camviewer_rs::camera_pipeline::{
    CheckpointCompression, CheckpointWriter, Colormap, Frame, FrameProcessor, RenderParams,
    TiffCheckpointWriter, ViewMode,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;

fn generate_mock_frame(width: usize, height: usize) -> Frame {
    let pixels = Array2::from_shape_fn((height, width), |(y, x)| (200 + ((x * 7 + y * 13) % 4000)) as i16);
    Frame { sequence: 0, pixels }
}

fn benchmark_processing_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_by_size");

    let sizes = vec![
        (256, 256, "256x256"),
        (512, 512, "512x512"),
        (1390, 1040, "1390x1040"),
    ];

    for (width, height, label) in sizes {
        let frame = generate_mock_frame(width, height);

        group.bench_with_input(BenchmarkId::from_parameter(label), &frame, |b, frame| {
            let side = width.min(height);
            let mut processor = FrameProcessor::new(side, (640, 640), Instant::now());
            let params = RenderParams::default();

            b.iter(|| processor.process(black_box(frame), &params));
        });
    }

    group.finish();
}

fn benchmark_views(c: &mut Criterion) {
    let mut group = c.benchmark_group("views");
    let frame = generate_mock_frame(512, 512);

    for view in [ViewMode::Raw, ViewMode::Cumulative, ViewMode::Difference] {
        group.bench_with_input(BenchmarkId::from_parameter(view), &frame, |b, frame| {
            let mut processor = FrameProcessor::new(512, (640, 640), Instant::now());
            let params = RenderParams {
                view,
                colormap: Colormap::Viridis,
                floor_percent: 5.0,
                ceiling_percent: 95.0,
                rotation: 1,
            };

            b.iter(|| processor.process(black_box(frame), &params));
        });
    }

    group.finish();
}

fn benchmark_rotation(c: &mut Criterion) {
    let mut group = c.benchmark_group("rotation");
    let image = Array2::from_shape_fn((1040, 1040), |(y, x)| (x + y) as f64);

    for quadrants in 0..4u8 {
        group.bench_with_input(BenchmarkId::from_parameter(quadrants), &image, |b, image| {
            b.iter(|| transform::rotate_quadrants(black_box(image), quadrants));
        });
    }

    group.finish();
}

fn benchmark_checkpoint_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("checkpoint_compression");
    group.sample_size(20);
    let image = Array2::from_shape_fn((1040, 1040), |(y, x)| ((x * y) % 255) as f64 / 3.0);
    let dir = std::env::temp_dir();

    let compressions = vec![
        (CheckpointCompression::None, "none"),
        (CheckpointCompression::Lzw, "lzw"),
        (CheckpointCompression::DeflateFast, "deflate_fast"),
        (CheckpointCompression::DeflateBalanced, "deflate_balanced"),
    ];

    for (compression, label) in compressions {
        let path = dir.join(format!("camviewer_bench_{label}.tiff"));
        group.bench_with_input(BenchmarkId::from_parameter(label), &image, |b, image| {
            let writer = TiffCheckpointWriter::new(compression);
            b.iter(|| writer.write_snapshot(&path, black_box(image)));
        });
        let _ = std::fs::remove_file(&path);
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_processing_sizes,
    benchmark_views,
    benchmark_rotation,
    benchmark_checkpoint_compression
);
criterion_main!(benches);
