use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("Camera is not connected")]
    NotConnected,

    #[error("Device error: {0}")]
    DeviceError(String),

    #[error("Frame source is unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Acquisition thread panicked")]
    ProducerPanicked,

    #[error("Invalid frame dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Session is already running")]
    SessionRunning,

    #[error("No acquisition session is running")]
    SessionIdle,

    #[error("Failed to encode checkpoint: {0}")]
    EncodeError(String),

    #[error("Failed to write checkpoint {0}")]
    CheckpointWriteError(String),

    #[error("Failed to read setup file: {0}")]
    SetupError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AcquisitionError>;
