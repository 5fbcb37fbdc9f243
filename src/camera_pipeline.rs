//! Camera acquisition pipeline module
//!
//! Frames flow from a [`FrameSource`] on a dedicated producer thread, through a
//! two-slot [`FrameReceiver`] channel, into the [`FrameProcessor`] which keeps the
//! session accumulators and renders display bitmaps. The [`SessionController`] ties
//! the pieces together and periodically checkpoints the running mean to disk.

pub mod common;
pub mod source;
pub mod channel;
pub mod producer;
pub mod processing;
pub mod checkpoint;
pub mod session;
pub mod setup;

pub use common::{
    AcquisitionError,
    Result,
};

pub use source::{
    DeviceControl,
    DeviceSettings,
    Dimensions,
    Frame,
    FrameSource,
    ScriptedSource,
    SourceConfig,
    Subarea,
    SubareaEdge,
    SyntheticSource,
    TriggerMode,
};

pub use channel::{
    frame_channel,
    FrameReceiver,
    FrameSender,
    PushOutcome,
    FRAME_CHANNEL_CAPACITY,
};

pub use producer::{
    AcquisitionProducer,
    ProducerExit,
    ProducerOutcome,
    SpawnError,
};

pub use processing::{
    Accumulators,
    Colormap,
    DisplayFrame,
    FpsCounter,
    FrameProcessor,
    RenderParams,
    StageTimings,
    ViewMode,
};

pub use checkpoint::{
    sequenced_output_path,
    CheckpointCompression,
    CheckpointSchedule,
    CheckpointWriter,
    TiffCheckpointWriter,
};

pub use session::{
    SessionConfig,
    SessionConfigBuilder,
    SessionController,
    SessionControls,
    SessionEvent,
    SessionState,
    SessionSummary,
    TickReport,
};

pub use setup::OperatorSetup;
