//! Operator-controlled render parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::camera_pipeline::common::error::{AcquisitionError, Result};
use crate::camera_pipeline::processing::colormap::Colormap;

/// Which image is rendered for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// The processed frame itself
    #[default]
    Raw,
    /// Running mean of the session
    Cumulative,
    /// Shot-on minus shot-off accumulation
    Difference,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewMode::Raw => "raw",
            ViewMode::Cumulative => "cumulative",
            ViewMode::Difference => "difference",
        })
    }
}

impl FromStr for ViewMode {
    type Err = AcquisitionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(ViewMode::Raw),
            "cumulative" | "mean" => Ok(ViewMode::Cumulative),
            "difference" | "shot" => Ok(ViewMode::Difference),
            other => Err(AcquisitionError::InvalidSetting(format!("unknown view mode '{other}'"))),
        }
    }
}

/// Parameters read by the processor on every frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParams {
    /// Number of 90° counter-clockwise turns, 0–3
    pub rotation: u8,
    /// Samples below this percentage of the frame maximum are zeroed
    pub floor_percent: f64,
    /// Samples above this percentage of the frame maximum saturate to 255
    pub ceiling_percent: f64,
    pub colormap: Colormap,
    pub view: ViewMode,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            rotation: 0,
            floor_percent: 0.0,
            ceiling_percent: 100.0,
            colormap: Colormap::Gray,
            view: ViewMode::Raw,
        }
    }
}

impl RenderParams {
    /// Adds `steps` quarter turns; negative steps turn the other way.
    pub fn rotate_by(&mut self, steps: i32) {
        self.rotation = (self.rotation as i32 + steps).rem_euclid(4) as u8;
    }

    pub fn rotation_degrees(&self) -> u32 {
        self.rotation as u32 * 90
    }

    pub fn set_thresholds(&mut self, floor_percent: f64, ceiling_percent: f64) -> Result<()> {
        check_percent(floor_percent)?;
        check_percent(ceiling_percent)?;
        self.floor_percent = floor_percent;
        self.ceiling_percent = ceiling_percent;
        Ok(())
    }

    /// Checks values that bypassed the setters, e.g. from a setup file.
    pub fn validate(&self) -> Result<()> {
        check_percent(self.floor_percent)?;
        check_percent(self.ceiling_percent)?;
        if self.rotation > 3 {
            return Err(AcquisitionError::InvalidSetting(format!(
                "rotation {} is not a quadrant 0-3",
                self.rotation
            )));
        }
        Ok(())
    }
}

fn check_percent(value: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&value) {
        return Err(AcquisitionError::InvalidSetting(format!(
            "threshold {value} is outside 0-100 percent"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_wraps_both_ways() {
        let mut params = RenderParams::default();
        params.rotate_by(1);
        params.rotate_by(1);
        params.rotate_by(1);
        params.rotate_by(1);
        assert_eq!(params.rotation, 0);
        params.rotate_by(-1);
        assert_eq!(params.rotation, 3);
        assert_eq!(params.rotation_degrees(), 270);
    }

    #[test]
    fn thresholds_outside_percent_range_are_rejected() {
        let mut params = RenderParams::default();
        assert!(params.set_thresholds(-1.0, 50.0).is_err());
        assert!(params.set_thresholds(10.0, 101.0).is_err());
        assert!(params.set_thresholds(f64::NAN, 50.0).is_err());
        params.set_thresholds(5.0, 95.0).unwrap();
        assert_eq!((params.floor_percent, params.ceiling_percent), (5.0, 95.0));
    }

    #[test]
    fn view_modes_parse() {
        assert_eq!("Cumulative".parse::<ViewMode>().unwrap(), ViewMode::Cumulative);
        assert_eq!("difference".parse::<ViewMode>().unwrap(), ViewMode::Difference);
        assert!("average".parse::<ViewMode>().is_err());
    }
}
