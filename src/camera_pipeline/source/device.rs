//! Device configuration: vendor setters and the settings applied through them.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::camera_pipeline::source::subarea::Subarea;

/// Readout speed the camera is always driven at.
const READOUT_SPEED: u32 = 1;

/// How exposures are started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// External trigger input starts each exposure
    #[default]
    Hardware,
    /// Free-running, exposures started by the driver
    Software,
}

impl TriggerMode {
    /// Mode number understood by the camera driver.
    pub fn vendor_code(self) -> i32 {
        match self {
            TriggerMode::Hardware => 6,
            TriggerMode::Software => 0,
        }
    }
}

/// Fire-and-forget device setters.
///
/// Every call returns the raw vendor status code. Codes are logged, never
/// interpreted: the meaning of "success" differs between calls on real hardware.
pub trait DeviceControl {
    fn set_trigger_mode(&mut self, code: i32) -> i32;
    fn write_video_gain(&mut self, gain: u32) -> i32;
    fn write_intensifier_gain(&mut self, gain: u32) -> i32;
    fn write_exposure(&mut self, exposure_ms: u32) -> i32;
    fn write_readout_speed(&mut self, speed: u32) -> i32;
    fn set_subarea_and_binning(&mut self, subarea: &Subarea) -> i32;
}

/// Camera parameters chosen by the operator before a session starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    pub trigger: TriggerMode,
    pub video_gain: u32,
    pub intensifier_gain: u32,
    /// Exposure time in milliseconds
    pub exposure_ms: u32,
    pub subarea: Subarea,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            trigger: TriggerMode::Hardware,
            video_gain: 0,
            intensifier_gain: 0,
            exposure_ms: 100,
            subarea: Subarea::default(),
        }
    }
}

impl DeviceSettings {
    /// Pushes every setting to the device and returns the `(setter, status)` pairs.
    #[instrument(skip_all, fields(trigger = ?self.trigger, exposure_ms = self.exposure_ms))]
    pub fn apply<D: DeviceControl + ?Sized>(&self, device: &mut D) -> Vec<(&'static str, i32)> {
        if !self.subarea.is_valid() {
            warn!(subarea = ?self.subarea, "Subarea has an empty readout, sending anyway");
        }

        let statuses = vec![
            ("trigger", device.set_trigger_mode(self.trigger.vendor_code())),
            ("video gain", device.write_video_gain(self.video_gain)),
            ("intensifier", device.write_intensifier_gain(self.intensifier_gain)),
            ("exposure", device.write_exposure(self.exposure_ms)),
            ("readout", device.write_readout_speed(READOUT_SPEED)),
            ("subarea", device.set_subarea_and_binning(&self.subarea)),
        ];

        for (setter, status) in &statuses {
            info!(setter, status, "Device setter returned");
        }
        info!("Done setting up camera");
        statuses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingDevice {
        calls: Vec<String>,
    }

    impl DeviceControl for RecordingDevice {
        fn set_trigger_mode(&mut self, code: i32) -> i32 {
            self.calls.push(format!("trigger {code}"));
            0
        }
        fn write_video_gain(&mut self, gain: u32) -> i32 {
            self.calls.push(format!("gain {gain}"));
            0
        }
        fn write_intensifier_gain(&mut self, gain: u32) -> i32 {
            self.calls.push(format!("intensifier {gain}"));
            0
        }
        fn write_exposure(&mut self, exposure_ms: u32) -> i32 {
            self.calls.push(format!("exposure {exposure_ms}"));
            0
        }
        fn write_readout_speed(&mut self, speed: u32) -> i32 {
            self.calls.push(format!("readout {speed}"));
            1
        }
        fn set_subarea_and_binning(&mut self, subarea: &Subarea) -> i32 {
            self.calls.push(format!("subarea {}x{}", subarea.readout_width(), subarea.readout_height()));
            -3
        }
    }

    #[test]
    fn apply_drives_every_setter_in_order() {
        let settings = DeviceSettings {
            trigger: TriggerMode::Software,
            video_gain: 3,
            intensifier_gain: 7,
            exposure_ms: 20,
            subarea: Subarea { origin_x: 0, origin_y: 0, end_x: 100, end_y: 50, bin_x: 2, bin_y: 1 },
        };
        let mut device = RecordingDevice::default();

        let statuses = settings.apply(&mut device);

        assert_eq!(
            device.calls,
            vec!["trigger 0", "gain 3", "intensifier 7", "exposure 20", "readout 1", "subarea 50x50"]
        );
        assert_eq!(statuses.last(), Some(&("subarea", -3)));
    }

    #[test]
    fn hardware_trigger_maps_to_vendor_mode_six() {
        assert_eq!(TriggerMode::Hardware.vendor_code(), 6);
        assert_eq!(TriggerMode::default(), TriggerMode::Hardware);
    }
}
