//! Session configuration types

use std::path::PathBuf;
use std::time::Duration;

use crate::camera_pipeline::checkpoint::schedule::DEFAULT_CHECKPOINT_INTERVAL;
use crate::camera_pipeline::source::SourceConfig;

/// Static configuration of the session controller
///
/// The output location is read when a session starts; changing it affects the
/// next session only.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Directory checkpoint files are created in
    pub directory: PathBuf,
    /// File name stem, before the `_NNNN` session suffix
    pub base_name: String,
    /// Checkpoint file extension, without the dot
    pub extension: String,
    /// Minimum time between periodic checkpoints
    pub checkpoint_interval: Duration,
    /// Size of the display surface the bitmap is fitted to
    pub display_size: (u32, u32),
    /// Handed to the device on initialization
    pub source: SourceConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            base_name: "data".to_string(),
            extension: "tiff".to_string(),
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            display_size: (640, 640),
            source: SourceConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }
}

/// Builder for SessionConfig
#[derive(Default)]
pub struct SessionConfigBuilder {
    directory: Option<PathBuf>,
    base_name: Option<String>,
    extension: Option<String>,
    checkpoint_interval: Option<Duration>,
    display_size: Option<(u32, u32)>,
    source: Option<SourceConfig>,
}

impl SessionConfigBuilder {
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn base_name(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = Some(base_name.into());
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn checkpoint_interval(mut self, interval: Duration) -> Self {
        self.checkpoint_interval = Some(interval);
        self
    }

    pub fn display_size(mut self, width: u32, height: u32) -> Self {
        self.display_size = Some((width, height));
        self
    }

    pub fn source(mut self, source: SourceConfig) -> Self {
        self.source = Some(source);
        self
    }

    pub fn build(self) -> SessionConfig {
        let default = SessionConfig::default();
        SessionConfig {
            directory: self.directory.unwrap_or(default.directory),
            base_name: self.base_name.unwrap_or(default.base_name),
            extension: self.extension.unwrap_or(default.extension),
            checkpoint_interval: self.checkpoint_interval.unwrap_or(default.checkpoint_interval),
            display_size: self.display_size.unwrap_or(default.display_size),
            source: self.source.unwrap_or(default.source),
        }
    }
}
