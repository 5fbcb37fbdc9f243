//! Frame source data types

use std::path::PathBuf;

use ndarray::Array2;

/// Sensor readout size as reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    /// Width of the readout in pixels
    pub width: usize,
    /// Height of the readout in pixels
    pub height: usize,
}

impl Dimensions {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Side of the square every frame is cropped to.
    pub fn square_side(&self) -> usize {
        self.width.min(self.height)
    }

    /// Shape of a capture buffer in `(rows, cols)` order.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }
}

/// One captured intensity frame, pre-processing
#[derive(Debug, Clone)]
pub struct Frame {
    /// Capture index within the session, counting dropped frames
    pub sequence: u64,
    /// Raw signed 16-bit samples, `height × width`
    pub pixels: Array2<i16>,
}

/// Parameters handed to the device at initialization
#[derive(Debug, Clone, Default)]
pub struct SourceConfig {
    /// Directory holding the vendor calibration files
    pub calibration_dir: PathBuf,
}
