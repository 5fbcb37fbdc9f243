use std::path::Path;

use ndarray::Array2;

use crate::camera_pipeline::common::error::Result;

/// Storage backend for session checkpoints.
///
/// Each call replaces whatever `path` held with a single compressed 2D dataset.
pub trait CheckpointWriter: Send {
    fn write_snapshot(&self, path: &Path, image: &Array2<f64>) -> Result<()>;
}
