use std::time::Duration;

use ndarray::Array2;

use crate::camera_pipeline::common::error::{AcquisitionError, Result};
use crate::camera_pipeline::source::adapter::FrameSource;
use crate::camera_pipeline::source::types::{Dimensions, SourceConfig};

/// Replays prepared frames.
///
/// A single frame is repeated forever. A longer list is played once, after which
/// every capture fails with a device error, like a camera that went away.
pub struct ScriptedSource {
    dimensions: Dimensions,
    frames: Vec<Array2<i16>>,
    next: usize,
    interval: Option<Duration>,
}

impl ScriptedSource {
    pub fn new(frames: Vec<Array2<i16>>) -> Self {
        let dimensions = frames
            .first()
            .map(|f| Dimensions::new(f.ncols(), f.nrows()))
            .unwrap_or(Dimensions::new(0, 0));
        Self {
            dimensions,
            frames,
            next: 0,
            interval: None,
        }
    }

    pub fn repeating(frame: Array2<i16>) -> Self {
        Self::new(vec![frame])
    }

    /// Sleeps between captures instead of spinning.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }
}

impl FrameSource for ScriptedSource {
    fn initialize(&mut self, _config: &SourceConfig) -> Result<bool> {
        Ok(!self.frames.is_empty())
    }

    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn capture_into(&mut self, buffer: &mut Array2<i16>) -> Result<()> {
        if let Some(interval) = self.interval {
            std::thread::sleep(interval);
        }

        let index = if self.frames.len() == 1 {
            0
        } else {
            if self.next >= self.frames.len() {
                return Err(AcquisitionError::DeviceError("No more frames".to_string()));
            }
            self.next += 1;
            self.next - 1
        };

        let frame = &self.frames[index];
        if frame.dim() != buffer.dim() {
            return Err(AcquisitionError::InvalidDimensions(frame.ncols(), frame.nrows()));
        }
        buffer.assign(frame);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}
