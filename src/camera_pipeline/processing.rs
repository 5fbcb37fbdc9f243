//! Frame processing module
//!
//! The per-frame transform chain, the session accumulators and the rendering of
//! the selected view into a display bitmap.

mod accumulator;
mod colormap;
mod fps;
mod params;
mod processor;
pub mod render;
mod timing;
pub mod transform;

pub use accumulator::Accumulators;
pub use colormap::Colormap;
pub use fps::FpsCounter;
pub use params::{RenderParams, ViewMode};
pub use processor::FrameProcessor;
pub use render::DisplayFrame;
pub use timing::{StageTimings, StepTiming, Timer};
