use std::time::Instant;

use ndarray::Array2;
use tracing::{trace, warn};

use crate::camera_pipeline::processing::accumulator::Accumulators;
use crate::camera_pipeline::processing::fps::FpsCounter;
use crate::camera_pipeline::processing::params::RenderParams;
use crate::camera_pipeline::processing::render::{self, DisplayFrame};
use crate::camera_pipeline::processing::timing::{StageTimings, Timer};
use crate::camera_pipeline::processing::transform;
use crate::camera_pipeline::source::Frame;

/// Consumer side of the pipeline.
///
/// Owns the session accumulators; nothing outside the tick context touches them.
pub struct FrameProcessor {
    side: usize,
    surface: (u32, u32),
    accumulators: Accumulators,
    fps: FpsCounter,
    timings: StageTimings,
}

impl FrameProcessor {
    pub fn new(side: usize, surface: (u32, u32), now: Instant) -> Self {
        Self {
            side,
            surface,
            accumulators: Accumulators::new(side),
            fps: FpsCounter::new(now),
            timings: StageTimings::new(),
        }
    }

    /// Crop, floor removal, thresholding and rotation.
    ///
    /// Returns `None` for a frame smaller than the session square.
    pub fn prepare(&mut self, frame: &Frame, params: &RenderParams) -> Option<Array2<f64>> {
        let (rows, cols) = frame.pixels.dim();
        if rows < self.side || cols < self.side {
            warn!(
                sequence = frame.sequence,
                rows,
                cols,
                side = self.side,
                "Frame smaller than session square, skipping"
            );
            return None;
        }

        let timer = Timer::start("crop");
        let mut image = transform::crop_square(&frame.pixels, self.side);
        timer.stop_into(&mut self.timings);

        let timer = Timer::start("floor");
        transform::subtract_floor(&mut image);
        timer.stop_into(&mut self.timings);

        let timer = Timer::start("threshold");
        transform::apply_percentile_threshold(&mut image, params.floor_percent, params.ceiling_percent);
        timer.stop_into(&mut self.timings);

        let timer = Timer::start("rotate");
        let image = transform::rotate_quadrants(&image, params.rotation);
        timer.stop_into(&mut self.timings);

        Some(image)
    }

    /// Runs the whole chain for one frame and renders the selected view.
    pub fn process(&mut self, frame: &Frame, params: &RenderParams) -> Option<DisplayFrame> {
        self.timings = StageTimings::new();
        let image = self.prepare(frame, params)?;

        let timer = Timer::start("accumulate");
        self.accumulators.accumulate(&image);
        timer.stop_into(&mut self.timings);

        let timer = Timer::start("render");
        let selected = render::select_view(params.view, &image, &self.accumulators);
        let bitmap = render::colorize(&selected, params.colormap);
        let bitmap = render::fit_to_surface(bitmap, self.surface);
        timer.stop_into(&mut self.timings);

        self.fps.record_frame();
        trace!(
            sequence = frame.sequence,
            total_ms = self.timings.total_duration().as_secs_f64() * 1000.0,
            timings = %self.timings.summary(),
            "Frame processed"
        );

        Some(DisplayFrame {
            image: bitmap,
            fps: self.fps.rate(),
            view: params.view,
            shot_count: self.accumulators.shot_count(),
        })
    }

    pub fn reset_accumulators(&mut self) {
        self.accumulators.reset();
    }

    /// Advances the fps window; returns the new rate when a window closed.
    pub fn tick_fps(&mut self, now: Instant) -> Option<u32> {
        self.fps.tick(now)
    }

    pub fn fps(&self) -> u32 {
        self.fps.rate()
    }

    pub fn accumulators(&self) -> &Accumulators {
        &self.accumulators
    }

    pub fn last_timings(&self) -> &StageTimings {
        &self.timings
    }
}
