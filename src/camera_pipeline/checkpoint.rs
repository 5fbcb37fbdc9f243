//! Checkpoint module
//!
//! Periodic snapshots of the running mean to a compressed single-dataset file,
//! with per-session filename sequencing.

pub mod schedule;
mod sequence;
mod tiff_checkpoint_writer;
pub mod types;
mod writer;

pub use schedule::CheckpointSchedule;
pub use sequence::sequenced_output_path;
pub use tiff_checkpoint_writer::{TiffCheckpointWriter, DATASET_NAME};
pub use types::CheckpointCompression;
pub use writer::CheckpointWriter;
