use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::camera_pipeline::common::error::AcquisitionError;

type Stop = (f32, [u8; 3]);

const GRAY: &[Stop] = &[(0.0, [0, 0, 0]), (1.0, [255, 255, 255])];

const VIRIDIS: &[Stop] = &[
    (0.000, [0x44, 0x01, 0x54]),
    (0.111, [0x48, 0x28, 0x78]),
    (0.222, [0x3e, 0x49, 0x89]),
    (0.333, [0x31, 0x68, 0x8e]),
    (0.444, [0x26, 0x82, 0x8e]),
    (0.556, [0x1f, 0x9e, 0x89]),
    (0.667, [0x35, 0xb7, 0x79]),
    (0.778, [0x6e, 0xce, 0x58]),
    (0.889, [0xb5, 0xde, 0x2b]),
    (1.000, [0xfd, 0xe7, 0x25]),
];

const PLASMA: &[Stop] = &[
    (0.000, [0x0d, 0x08, 0x87]),
    (0.111, [0x46, 0x03, 0x9f]),
    (0.222, [0x72, 0x01, 0xa8]),
    (0.333, [0x9c, 0x17, 0x9e]),
    (0.444, [0xbd, 0x37, 0x86]),
    (0.556, [0xd8, 0x57, 0x6b]),
    (0.667, [0xed, 0x79, 0x53]),
    (0.778, [0xfb, 0x9f, 0x3a]),
    (0.889, [0xfd, 0xca, 0x26]),
    (1.000, [0xf0, 0xf9, 0x21]),
];

const INFERNO: &[Stop] = &[
    (0.000, [0x00, 0x00, 0x04]),
    (0.111, [0x1b, 0x0c, 0x41]),
    (0.222, [0x4a, 0x0c, 0x6b]),
    (0.333, [0x78, 0x1c, 0x6d]),
    (0.444, [0xa5, 0x2c, 0x60]),
    (0.556, [0xcf, 0x44, 0x46]),
    (0.667, [0xed, 0x69, 0x25]),
    (0.778, [0xfb, 0x9b, 0x06]),
    (0.889, [0xf7, 0xd1, 0x3d]),
    (1.000, [0xfc, 0xff, 0xa4]),
];

const MAGMA: &[Stop] = &[
    (0.000, [0x00, 0x00, 0x04]),
    (0.111, [0x18, 0x0f, 0x3d]),
    (0.222, [0x44, 0x0f, 0x76]),
    (0.333, [0x72, 0x1f, 0x81]),
    (0.444, [0x9e, 0x2f, 0x7f]),
    (0.556, [0xcd, 0x40, 0x71]),
    (0.667, [0xf1, 0x60, 0x5d]),
    (0.778, [0xfd, 0x96, 0x68]),
    (0.889, [0xfe, 0xca, 0x8d]),
    (1.000, [0xfc, 0xfd, 0xbf]),
];

const HOT: &[Stop] = &[
    (0.000, [10, 0, 0]),
    (0.365, [255, 0, 0]),
    (0.746, [255, 255, 0]),
    (1.000, [255, 255, 255]),
];

const JET: &[Stop] = &[
    (0.000, [0, 0, 128]),
    (0.125, [0, 0, 255]),
    (0.375, [0, 255, 255]),
    (0.625, [255, 255, 0]),
    (0.875, [255, 0, 0]),
    (1.000, [128, 0, 0]),
];

/// Color map applied to the single-channel 0–255 display image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Gray,
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Hot,
    Jet,
}

impl Colormap {
    pub const ALL: [Colormap; 7] = [
        Colormap::Gray,
        Colormap::Viridis,
        Colormap::Plasma,
        Colormap::Inferno,
        Colormap::Magma,
        Colormap::Hot,
        Colormap::Jet,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Colormap::Gray => "gray",
            Colormap::Viridis => "viridis",
            Colormap::Plasma => "plasma",
            Colormap::Inferno => "inferno",
            Colormap::Magma => "magma",
            Colormap::Hot => "hot",
            Colormap::Jet => "jet",
        }
    }

    fn stops(&self) -> &'static [Stop] {
        match self {
            Colormap::Gray => GRAY,
            Colormap::Viridis => VIRIDIS,
            Colormap::Plasma => PLASMA,
            Colormap::Inferno => INFERNO,
            Colormap::Magma => MAGMA,
            Colormap::Hot => HOT,
            Colormap::Jet => JET,
        }
    }

    /// 256-entry lookup table, index = display intensity.
    pub fn lut(&self) -> [[u8; 3]; 256] {
        let stops = self.stops();
        let mut table = [[0u8; 3]; 256];
        for (index, entry) in table.iter_mut().enumerate() {
            *entry = interpolate(stops, index as f32 / 255.0);
        }
        table
    }
}

fn interpolate(stops: &[Stop], t: f32) -> [u8; 3] {
    let upper = stops
        .iter()
        .position(|(at, _)| *at >= t)
        .unwrap_or(stops.len() - 1);
    if upper == 0 {
        return stops[0].1;
    }

    let (t0, c0) = stops[upper - 1];
    let (t1, c1) = stops[upper];
    let w = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
    let mut rgb = [0u8; 3];
    for channel in 0..3 {
        let v = c0[channel] as f32 + (c1[channel] as f32 - c0[channel] as f32) * w;
        rgb[channel] = v.round().clamp(0.0, 255.0) as u8;
    }
    rgb
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Colormap {
    type Err = AcquisitionError;

    /// Case-insensitive; "none" selects the gray map.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        match wanted.as_str() {
            "none" | "grey" | "greys" | "gray" => Ok(Colormap::Gray),
            _ => Colormap::ALL
                .into_iter()
                .find(|map| map.name() == wanted)
                .ok_or_else(|| AcquisitionError::InvalidSetting(format!("unknown colour map '{s}'"))),
        }
    }
}
