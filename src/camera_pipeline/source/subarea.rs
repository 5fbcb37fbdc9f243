//! Readout subarea and binning with the sensor's edit constraints.

use serde::{Deserialize, Serialize};

use crate::camera_pipeline::common::error::{AcquisitionError, Result};

/// Widest readout the sensor accepts; larger spans lock up the camera.
pub const SENSOR_LIMIT_X: u32 = 1390;
pub const SENSOR_LIMIT_Y: u32 = 1040;

/// Minimum distance kept between an origin and its end coordinate.
pub const MIN_SUBAREA_SPAN: u32 = 10;

/// The subarea field an operator just edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubareaEdge {
    OriginX,
    EndX,
    OriginY,
    EndY,
}

/// Region of the sensor that is read out, plus on-chip binning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subarea {
    pub origin_x: u32,
    pub origin_y: u32,
    pub end_x: u32,
    pub end_y: u32,
    pub bin_x: u32,
    pub bin_y: u32,
}

impl Default for Subarea {
    fn default() -> Self {
        Self {
            origin_x: 0,
            origin_y: 0,
            end_x: SENSOR_LIMIT_X,
            end_y: SENSOR_LIMIT_Y,
            bin_x: 1,
            bin_y: 1,
        }
    }
}

impl Subarea {
    /// Applies the edit rules after `edge` changed.
    ///
    /// An origin dragged within [`MIN_SUBAREA_SPAN`] of its end is pulled back; an
    /// end dragged too close to its origin is pushed out. An end beyond the sensor
    /// limit whose span also exceeds the limit drags the origin along so the
    /// readout never grows past what the sensor supports.
    pub fn constrain(&mut self, edge: SubareaEdge) {
        match edge {
            SubareaEdge::OriginX => pull_origin(&mut self.origin_x, self.end_x),
            SubareaEdge::OriginY => pull_origin(&mut self.origin_y, self.end_y),
            SubareaEdge::EndX => push_end(&mut self.origin_x, &mut self.end_x, SENSOR_LIMIT_X),
            SubareaEdge::EndY => push_end(&mut self.origin_y, &mut self.end_y, SENSOR_LIMIT_Y),
        }
    }

    /// Binned readout width in pixels.
    pub fn readout_width(&self) -> u32 {
        self.end_x.saturating_sub(self.origin_x) / self.bin_x.max(1)
    }

    /// Binned readout height in pixels.
    pub fn readout_height(&self) -> u32 {
        self.end_y.saturating_sub(self.origin_y) / self.bin_y.max(1)
    }

    /// Checks a subarea that bypassed [`constrain`](Self::constrain), e.g. one
    /// read from a setup file.
    pub fn validate(&self) -> Result<()> {
        let axes = [
            ("x", self.origin_x, self.end_x, SENSOR_LIMIT_X),
            ("y", self.origin_y, self.end_y, SENSOR_LIMIT_Y),
        ];
        for (axis, origin, end, limit) in axes {
            if end > limit || origin.saturating_add(MIN_SUBAREA_SPAN) > end {
                return Err(AcquisitionError::InvalidSetting(format!(
                    "subarea {axis} range {origin}..{end} must span at least {MIN_SUBAREA_SPAN} within 0..{limit}"
                )));
            }
        }
        if self.bin_x == 0 || self.bin_y == 0 {
            return Err(AcquisitionError::InvalidSetting("subarea binning must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.bin_x > 0
            && self.bin_y > 0
            && self.readout_width() > 0
            && self.readout_height() > 0
    }
}

fn pull_origin(origin: &mut u32, end: u32) {
    if end < origin.saturating_add(MIN_SUBAREA_SPAN) {
        *origin = end.saturating_sub(MIN_SUBAREA_SPAN);
    }
}

fn push_end(origin: &mut u32, end: &mut u32, limit: u32) {
    if *end < origin.saturating_add(MIN_SUBAREA_SPAN) {
        *end = origin.saturating_add(MIN_SUBAREA_SPAN);
    } else if *end > limit && *end - *origin > limit {
        *origin = *end - limit;
    }
}
