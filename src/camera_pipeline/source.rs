//! Frame source module
//!
//! Device-facing contracts: the blocking [`FrameSource`] capture interface, the
//! fire-and-forget [`DeviceControl`] setters, and two in-process sources used by the
//! binary and the tests.

mod adapter;
mod device;
mod scripted;
mod subarea;
mod synthetic;
pub mod types;

pub use adapter::FrameSource;
pub use device::{DeviceControl, DeviceSettings, TriggerMode};
pub use scripted::ScriptedSource;
pub use subarea::{Subarea, SubareaEdge, SENSOR_LIMIT_X, SENSOR_LIMIT_Y, MIN_SUBAREA_SPAN};
pub use synthetic::SyntheticSource;
pub use types::{Dimensions, Frame, SourceConfig};
