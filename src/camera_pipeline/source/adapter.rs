use ndarray::Array2;

use crate::camera_pipeline::common::error::Result;
use crate::camera_pipeline::source::types::{Dimensions, SourceConfig};

/// Synchronous interface to the imaging device.
///
/// `capture_into` blocks until the device delivers the next frame and has no
/// timeout: a hung driver call stalls the calling thread indefinitely. The
/// producer therefore owns the source on its own thread so a stuck capture can
/// never freeze display updates or checkpointing.
pub trait FrameSource: Send {
    /// Connects to the device. Returns `Ok(false)` when no camera answered.
    fn initialize(&mut self, config: &SourceConfig) -> Result<bool>;

    fn dimensions(&self) -> Dimensions;

    /// Fills `buffer` (shape `height × width`) with the next frame.
    fn capture_into(&mut self, buffer: &mut Array2<i16>) -> Result<()>;

    fn shutdown(&mut self) -> Result<()>;
}
