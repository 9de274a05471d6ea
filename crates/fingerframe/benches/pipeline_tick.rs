//! Per-tick cost of the gesture pipeline.
//!
//! Covers: steady-state `tick` for each policy, corner history push and the
//! crop projection.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fingerframe::gesture::{
    project_crop, CornerHistory, CropMode, FramePipeline, FramePipelineParams, FrameSize,
    PolicyKind,
};
use fingerframe::{CaptureOutcome, HandObservation, Handedness, Point, Quad};

fn hands(kind: PolicyKind, wobble: f32) -> Vec<HandObservation> {
    match kind {
        PolicyKind::DirectConnect => vec![
            HandObservation::from_tips(
                Point::new(0.30, 0.30 + wobble),
                Point::new(0.30, 0.70),
                Handedness::Left,
            ),
            HandObservation::from_tips(
                Point::new(0.70, 0.30),
                Point::new(0.70, 0.70 - wobble),
                Handedness::Right,
            ),
        ],
        _ => vec![
            HandObservation::from_tips(
                Point::new(0.70, 0.30 + wobble),
                Point::new(0.30, 0.70),
                Handedness::Left,
            ),
            HandObservation::from_tips(
                Point::new(0.31, 0.70),
                Point::new(0.70, 0.31 - wobble),
                Handedness::Right,
            ),
        ],
    }
}

fn bench_tick(c: &mut Criterion) {
    let frame = FrameSize::new(1920, 1080);
    let mut group = c.benchmark_group("tick");
    for kind in PolicyKind::ALL {
        let frames: Vec<_> = (0..64)
            .map(|i| hands(kind, 0.002 * ((i % 8) as f32 - 4.0)))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(kind), &frames, |b, frames| {
            let mut pipeline = FramePipeline::new(FramePipelineParams::for_policy(kind))
                .expect("default params are valid");
            let mut t = 0.0;
            let mut i = 0usize;
            b.iter(|| {
                let result = pipeline.tick(black_box(&frames[i % frames.len()]), frame, t);
                if let Some(capture) = &result.capture {
                    let _ = pipeline.finish_capture(capture.ticket, CaptureOutcome::Completed, t);
                }
                t += 16.0;
                i += 1;
                result.state
            });
        });
    }
    group.finish();
}

fn bench_history(c: &mut Criterion) {
    let quad = Quad::axis_aligned(Point::new(0.2, 0.2), Point::new(0.8, 0.8));
    c.bench_function("history_push_smooth", |b| {
        let mut history = CornerHistory::new(3);
        b.iter(|| {
            history.push(black_box(quad));
            history.smoothed()
        });
    });
}

fn bench_crop(c: &mut Criterion) {
    let quad = Quad::axis_aligned(Point::new(0.2, 0.2), Point::new(0.8, 0.8));
    let frame = FrameSize::new(3840, 2160);
    let mut group = c.benchmark_group("project_crop");
    for mode in [CropMode::BoundingBox, CropMode::Polygon] {
        let id = BenchmarkId::from_parameter(format!("{mode:?}"));
        group.bench_with_input(id, &mode, |b, &mode| {
            b.iter(|| project_crop(black_box(&quad), frame, mode));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tick, bench_history, bench_crop);
criterion_main!(benches);
