//! Checkpoint storage types

/// Compression applied to the stored dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckpointCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression
    Lzw,
    /// Deflate compression - fast level
    DeflateFast,
    /// Deflate compression - balanced (default)
    #[default]
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}
