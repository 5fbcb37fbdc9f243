//! In-process stand-in for the camera: a gaussian spot on a noisy pedestal.
//!
//! The spot is present on every other capture, so the difference view shows the
//! same shot-on/shot-off cancellation a pulsed source would produce on hardware.

use std::time::Duration;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::camera_pipeline::common::error::{AcquisitionError, Result};
use crate::camera_pipeline::source::adapter::FrameSource;
use crate::camera_pipeline::source::device::DeviceControl;
use crate::camera_pipeline::source::subarea::Subarea;
use crate::camera_pipeline::source::types::{Dimensions, SourceConfig};

const DEFAULT_PEDESTAL: i16 = 200;
const DEFAULT_NOISE: i16 = 20;
const DEFAULT_SPOT_AMPLITUDE: f64 = 3000.0;

pub struct SyntheticSource {
    dimensions: Dimensions,
    connected: bool,
    captured: u64,
    rng: StdRng,
    pedestal: i16,
    noise: i16,
    spot_amplitude: f64,
    fail_after: Option<u64>,
    paced: bool,
    exposure: Duration,
    gain: u32,
}

impl SyntheticSource {
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            connected: false,
            captured: 0,
            rng: StdRng::seed_from_u64(0x5eed),
            pedestal: DEFAULT_PEDESTAL,
            noise: DEFAULT_NOISE,
            spot_amplitude: DEFAULT_SPOT_AMPLITUDE,
            fail_after: None,
            paced: false,
            exposure: Duration::from_millis(100),
            gain: 0,
        }
    }

    /// Reports a device error once `frames` captures have succeeded.
    pub fn fail_after(mut self, frames: u64) -> Self {
        self.fail_after = Some(frames);
        self
    }

    /// Sleeps for the configured exposure on every capture.
    pub fn paced(mut self, paced: bool) -> Self {
        self.paced = paced;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn render_into(&mut self, buffer: &mut Array2<i16>) {
        let (rows, cols) = buffer.dim();
        let spot_on = self.captured % 2 == 0;
        let centre_row = rows as f64 / 2.0;
        let centre_col = cols as f64 / 2.0;
        let sigma = (rows.min(cols) as f64 / 8.0).max(1.0);
        let amplitude = self.spot_amplitude * (1.0 + self.gain as f64 / 10.0);
        let noise = self.noise.max(1);

        for ((row, col), sample) in buffer.indexed_iter_mut() {
            let mut value = self.pedestal as f64 + self.rng.gen_range(0..noise) as f64;
            if spot_on {
                let dr = row as f64 - centre_row;
                let dc = col as f64 - centre_col;
                value += amplitude * (-(dr * dr + dc * dc) / (2.0 * sigma * sigma)).exp();
            }
            *sample = value.clamp(i16::MIN as f64, i16::MAX as f64) as i16;
        }
    }
}

impl FrameSource for SyntheticSource {
    fn initialize(&mut self, config: &SourceConfig) -> Result<bool> {
        info!(
            calibration_dir = %config.calibration_dir.display(),
            "Synthetic camera initialized"
        );
        self.connected = true;
        Ok(true)
    }

    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn capture_into(&mut self, buffer: &mut Array2<i16>) -> Result<()> {
        if !self.connected {
            return Err(AcquisitionError::NotConnected);
        }
        if self.fail_after.is_some_and(|limit| self.captured >= limit) {
            return Err(AcquisitionError::DeviceError(format!(
                "synthetic camera stopped responding after {} frames",
                self.captured
            )));
        }
        if buffer.dim() != self.dimensions.shape() {
            return Err(AcquisitionError::InvalidDimensions(buffer.ncols(), buffer.nrows()));
        }
        if self.paced {
            std::thread::sleep(self.exposure);
        }

        self.render_into(buffer);
        self.captured += 1;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        debug!(captured = self.captured, "Synthetic camera closed");
        self.connected = false;
        Ok(())
    }
}

impl DeviceControl for SyntheticSource {
    fn set_trigger_mode(&mut self, _code: i32) -> i32 {
        0
    }

    fn write_video_gain(&mut self, gain: u32) -> i32 {
        self.gain = gain;
        0
    }

    fn write_intensifier_gain(&mut self, _gain: u32) -> i32 {
        0
    }

    fn write_exposure(&mut self, exposure_ms: u32) -> i32 {
        self.exposure = Duration::from_millis(exposure_ms as u64);
        0
    }

    fn write_readout_speed(&mut self, _speed: u32) -> i32 {
        1
    }

    fn set_subarea_and_binning(&mut self, subarea: &Subarea) -> i32 {
        if !subarea.is_valid() {
            return 1;
        }
        self.dimensions = Dimensions::new(
            subarea.readout_width() as usize,
            subarea.readout_height() as usize,
        );
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected(dimensions: Dimensions) -> SyntheticSource {
        let mut source = SyntheticSource::new(dimensions);
        assert!(source.initialize(&SourceConfig::default()).unwrap());
        source
    }

    #[test]
    fn spot_alternates_between_captures() {
        let dims = Dimensions::new(32, 32);
        let mut source = connected(dims);
        let mut on = Array2::zeros(dims.shape());
        let mut off = Array2::zeros(dims.shape());

        source.capture_into(&mut on).unwrap();
        source.capture_into(&mut off).unwrap();

        assert!(on[[16, 16]] > off[[16, 16]] + 1000);
    }

    #[test]
    fn capture_before_initialize_is_refused() {
        let dims = Dimensions::new(8, 8);
        let mut source = SyntheticSource::new(dims);
        let mut buffer = Array2::zeros(dims.shape());
        assert!(matches!(
            source.capture_into(&mut buffer),
            Err(AcquisitionError::NotConnected)
        ));
    }

    #[test]
    fn fails_after_configured_frame_count() {
        let dims = Dimensions::new(4, 4);
        let mut source = connected(dims).fail_after(2);
        let mut buffer = Array2::zeros(dims.shape());

        assert!(source.capture_into(&mut buffer).is_ok());
        assert!(source.capture_into(&mut buffer).is_ok());
        assert!(matches!(
            source.capture_into(&mut buffer),
            Err(AcquisitionError::DeviceError(_))
        ));
    }

    #[test]
    fn subarea_changes_reported_dimensions() {
        let mut source = SyntheticSource::new(Dimensions::new(64, 64));
        let area = Subarea { origin_x: 0, origin_y: 0, end_x: 40, end_y: 30, bin_x: 2, bin_y: 1 };
        assert_eq!(source.set_subarea_and_binning(&area), 0);
        assert_eq!(source.dimensions(), Dimensions::new(20, 30));
    }
}
