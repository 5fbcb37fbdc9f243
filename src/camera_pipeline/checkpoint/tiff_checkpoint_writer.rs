use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use ndarray::Array2;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray64Float;
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder};
use tiff::tags::Tag;
use tracing::{debug, instrument};

use crate::camera_pipeline::checkpoint::types::CheckpointCompression;
use crate::camera_pipeline::checkpoint::writer::CheckpointWriter;
use crate::camera_pipeline::common::error::{AcquisitionError, Result};

/// Name recorded with the stored dataset.
pub const DATASET_NAME: &str = "Intensity";

/// Stores the snapshot as a single-page 64-bit float grayscale TIFF.
///
/// The dataset name goes into the `ImageDescription` tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiffCheckpointWriter {
    pub compression: CheckpointCompression,
}

impl TiffCheckpointWriter {
    pub fn new(compression: CheckpointCompression) -> Self {
        Self { compression }
    }

    fn encode(&self, image: &Array2<f64>) -> Result<Vec<u8>> {
        let (rows, cols) = image.dim();
        if rows == 0 || cols == 0 {
            return Err(AcquisitionError::InvalidDimensions(cols, rows));
        }

        let compression = match self.compression {
            CheckpointCompression::None => Compression::Uncompressed,
            CheckpointCompression::Lzw => Compression::Lzw,
            CheckpointCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            CheckpointCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            CheckpointCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        let mut buffer = Vec::new();
        {
            let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
                .map_err(|e| AcquisitionError::EncodeError(e.to_string()))?
                .with_compression(compression);

            let mut page = encoder
                .new_image::<Gray64Float>(cols as u32, rows as u32)
                .map_err(|e| AcquisitionError::EncodeError(e.to_string()))?;
            page.encoder()
                .write_tag(Tag::ImageDescription, DATASET_NAME)
                .map_err(|e| AcquisitionError::EncodeError(e.to_string()))?;

            // Row-major order matches the strip layout.
            let samples: Vec<f64> = image.iter().copied().collect();
            page.write_data(&samples)
                .map_err(|e| AcquisitionError::EncodeError(e.to_string()))?;
        }

        Ok(buffer)
    }

    /// Loads a dataset written by [`CheckpointWriter::write_snapshot`].
    pub fn read_snapshot(path: &Path) -> Result<Array2<f64>> {
        let file = File::open(path)?;
        let mut decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| AcquisitionError::CheckpointWriteError(format!("{}: {}", path.display(), e)))?;

        let (width, height) = decoder
            .dimensions()
            .map_err(|e| AcquisitionError::CheckpointWriteError(e.to_string()))?;
        let samples = match decoder.read_image() {
            Ok(DecodingResult::F64(samples)) => samples,
            Ok(_) => {
                return Err(AcquisitionError::CheckpointWriteError(format!(
                    "{}: dataset is not 64-bit float",
                    path.display()
                )));
            }
            Err(e) => return Err(AcquisitionError::CheckpointWriteError(e.to_string())),
        };

        Array2::from_shape_vec((height as usize, width as usize), samples)
            .map_err(|_| AcquisitionError::InvalidDimensions(width as usize, height as usize))
    }
}

impl CheckpointWriter for TiffCheckpointWriter {
    #[instrument(skip(self, image), fields(path = %path.display(), shape = ?image.dim()))]
    fn write_snapshot(&self, path: &Path, image: &Array2<f64>) -> Result<()> {
        let buffer = self.encode(image)?;

        // Truncating write; every checkpoint replaces the previous one.
        std::fs::write(path, &buffer)
            .map_err(|e| AcquisitionError::CheckpointWriteError(format!("{}: {}", path.display(), e)))?;

        debug!(bytes = buffer.len(), "Checkpoint written");
        Ok(())
    }
}
