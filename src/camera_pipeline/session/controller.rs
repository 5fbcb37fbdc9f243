use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, instrument, warn};

use crate::camera_pipeline::channel::{frame_channel, FrameReceiver};
use crate::camera_pipeline::checkpoint::{sequenced_output_path, CheckpointSchedule, CheckpointWriter};
use crate::camera_pipeline::common::error::{AcquisitionError, Result};
use crate::camera_pipeline::processing::{Accumulators, DisplayFrame, FrameProcessor};
use crate::camera_pipeline::producer::{AcquisitionProducer, ProducerExit, ProducerOutcome};
use crate::camera_pipeline::session::config::SessionConfig;
use crate::camera_pipeline::session::controls::SessionControls;
use crate::camera_pipeline::source::{DeviceControl, DeviceSettings, FrameSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
}

/// Notifications for the operator, produced by the tick context
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    CheckpointWritten(PathBuf),
    /// Persistence I/O failed; acquisition carries on
    CheckpointFailed(String),
    /// The device failed and the producer exited; restart is manual
    AcquisitionStopped(String),
    FpsUpdated(u32),
}

/// Result of one cooperative tick
#[derive(Debug, Default)]
pub struct TickReport {
    /// Bitmap for the display sink, when a frame was processed this tick
    pub display: Option<DisplayFrame>,
    pub fps: u32,
    pub events: Vec<SessionEvent>,
}

/// What a finished session leaves behind
#[derive(Debug, Clone, Default)]
pub struct SessionSummary {
    pub output_path: Option<PathBuf>,
    pub frames_captured: u64,
    pub frames_dropped: u64,
    pub frames_processed: u64,
    pub shot_count: u64,
    pub checkpoints_written: u64,
    /// Why the producer ended early, if it did
    pub fault: Option<String>,
    /// Error of the final checkpoint write
    pub final_checkpoint_error: Option<String>,
}

struct ActiveSession<S> {
    producer: Option<AcquisitionProducer<S>>,
    receiver: FrameReceiver,
    processor: FrameProcessor,
    schedule: CheckpointSchedule,
    /// Set only when persistence was enabled at session start
    output_path: Option<PathBuf>,
    pending: Vec<SessionEvent>,
    frames_processed: u64,
    captured: u64,
    dropped: u64,
    checkpoints_written: u64,
    fault: Option<String>,
}

/// Drives one device through IDLE → RUNNING → IDLE sessions.
///
/// All processing happens inside [`tick`](Self::tick), which never blocks; the
/// only other thread is the acquisition producer.
pub struct SessionController<S: FrameSource + 'static, W: CheckpointWriter> {
    /// `None` while a producer thread owns the device
    source: Option<S>,
    writer: W,
    config: SessionConfig,
    controls: Arc<SessionControls>,
    session: Option<ActiveSession<S>>,
}

impl<S: FrameSource + 'static, W: CheckpointWriter> SessionController<S, W> {
    /// Initializes the device and returns an idle controller.
    #[instrument(skip_all)]
    pub fn new(mut source: S, writer: W, config: SessionConfig) -> Result<Self> {
        if !source.initialize(&config.source)? {
            error!("Camera did not answer during initialization");
            return Err(AcquisitionError::NotConnected);
        }
        let dimensions = source.dimensions();
        info!(width = dimensions.width, height = dimensions.height, "Camera connected");

        Ok(Self {
            source: Some(source),
            writer,
            config,
            controls: Arc::new(SessionControls::default()),
            session: None,
        })
    }

    /// Replaces the shared operator state, e.g. with one restored from a setup file.
    pub fn with_controls(mut self, controls: Arc<SessionControls>) -> Self {
        self.controls = controls;
        self
    }

    pub fn controls(&self) -> Arc<SessionControls> {
        Arc::clone(&self.controls)
    }

    pub fn state(&self) -> SessionState {
        if self.session.is_some() {
            SessionState::Running
        } else {
            SessionState::Idle
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Output location for the next session; a running session keeps its file.
    pub fn set_output_location(&mut self, directory: impl Into<PathBuf>, base_name: impl Into<String>) {
        self.config.directory = directory.into();
        self.config.base_name = base_name.into();
    }

    /// File of the running session, if persistence was on when it started.
    pub fn output_path(&self) -> Option<&Path> {
        self.session.as_ref().and_then(|s| s.output_path.as_deref())
    }

    pub fn accumulators(&self) -> Option<&Accumulators> {
        self.session.as_ref().map(|s| s.processor.accumulators())
    }

    /// Starts a session, or stops the running one.
    ///
    /// Returns the summary when this call ended a session.
    #[instrument(skip(self))]
    pub fn start(&mut self) -> Result<Option<SessionSummary>> {
        if self.session.is_some() {
            info!("Start requested while running, stopping instead");
            return self.stop();
        }

        let source = self
            .source
            .take()
            .ok_or_else(|| AcquisitionError::SourceUnavailable("device was lost by a previous session".to_string()))?;
        let dimensions = source.dimensions();
        let side = dimensions.square_side();
        if side == 0 {
            self.source = Some(source);
            return Err(AcquisitionError::InvalidDimensions(dimensions.width, dimensions.height));
        }

        // The producer starts before the file exists, so a failed spawn leaves no file behind.
        let (sender, receiver) = frame_channel();
        let producer = match AcquisitionProducer::spawn(source, sender) {
            Ok(producer) => producer,
            Err(failure) => {
                self.source = failure.source;
                return Err(failure.error);
            }
        };

        let now = Instant::now();
        let processor = FrameProcessor::new(side, self.config.display_size, now);
        let mut pending = Vec::new();

        let output_path = if self.controls.persist_enabled() {
            let path = sequenced_output_path(&self.config.directory, &self.config.base_name, &self.config.extension);
            if let Err(e) = self.writer.write_snapshot(&path, processor.accumulators().cumulative()) {
                warn!(path = %path.display(), error = %e, "Could not create checkpoint file");
                pending.push(SessionEvent::CheckpointFailed(e.to_string()));
            }
            Some(path)
        } else {
            None
        };

        // Requests made while idle do not carry into the new session.
        self.controls.take_reset();

        info!(
            side,
            output = ?output_path,
            interval_s = self.config.checkpoint_interval.as_secs_f64(),
            "Session started"
        );

        self.session = Some(ActiveSession {
            producer: Some(producer),
            receiver,
            processor,
            schedule: CheckpointSchedule::new(self.config.checkpoint_interval, now),
            output_path,
            pending,
            frames_processed: 0,
            captured: 0,
            dropped: 0,
            checkpoints_written: 0,
            fault: None,
        });
        Ok(None)
    }

    /// Stops the producer, writes the final checkpoint and returns to IDLE.
    ///
    /// Returns `None` when no session was running.
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> Result<Option<SessionSummary>> {
        let Some(mut session) = self.session.take() else {
            return Ok(None);
        };

        let mut join_error = None;
        if let Some(producer) = session.producer.take() {
            match producer.join() {
                Ok(outcome) => self.collect_outcome(&mut session, outcome),
                Err(e) => {
                    error!(error = %e, "Acquisition thread did not exit cleanly");
                    join_error = Some(e);
                }
            }
        }

        let mut final_checkpoint_error = None;
        if let Some(path) = session.output_path.as_deref() {
            if self.controls.persist_enabled() {
                match self.writer.write_snapshot(path, session.processor.accumulators().cumulative()) {
                    Ok(()) => {
                        session.checkpoints_written += 1;
                        info!(path = %path.display(), "Final checkpoint written");
                    }
                    Err(e) => {
                        error!(path = %path.display(), error = %e, "Final checkpoint failed");
                        final_checkpoint_error = Some(e.to_string());
                    }
                }
            }
        }

        let summary = SessionSummary {
            output_path: session.output_path,
            frames_captured: session.captured,
            frames_dropped: session.dropped,
            frames_processed: session.frames_processed,
            shot_count: session.processor.accumulators().shot_count(),
            checkpoints_written: session.checkpoints_written,
            fault: session.fault,
            final_checkpoint_error,
        };
        info!(
            processed = summary.frames_processed,
            captured = summary.frames_captured,
            dropped = summary.frames_dropped,
            "Session stopped"
        );

        match join_error {
            Some(e) => Err(e),
            None => Ok(Some(summary)),
        }
    }

    /// Marks the accumulators for reset before the next frame is processed.
    pub fn request_reset(&self) -> Result<()> {
        if self.session.is_none() {
            return Err(AcquisitionError::SessionIdle);
        }
        self.controls.request_reset();
        Ok(())
    }

    pub fn tick(&mut self) -> TickReport {
        self.tick_at(Instant::now())
    }

    /// One cooperative step: fault check, checkpoint, reset, fps, then at most
    /// one frame.
    pub fn tick_at(&mut self, now: Instant) -> TickReport {
        let Some(mut session) = self.session.take() else {
            return TickReport::default();
        };
        let mut events = std::mem::take(&mut session.pending);

        if session.producer.as_ref().is_some_and(|p| p.is_finished()) {
            if let Some(producer) = session.producer.take() {
                match producer.join() {
                    Ok(outcome) => self.collect_outcome(&mut session, outcome),
                    Err(e) => session.fault = Some(e.to_string()),
                }
                let reason = session
                    .fault
                    .clone()
                    .unwrap_or_else(|| "acquisition thread exited".to_string());
                events.push(SessionEvent::AcquisitionStopped(reason));
            }
        }

        if session.schedule.due(now) {
            if let Some(path) = session.output_path.as_deref() {
                if self.controls.persist_enabled() {
                    match self.writer.write_snapshot(path, session.processor.accumulators().cumulative()) {
                        Ok(()) => {
                            session.checkpoints_written += 1;
                            info!(path = %path.display(), "Checkpoint written");
                            events.push(SessionEvent::CheckpointWritten(path.to_path_buf()));
                        }
                        Err(e) => {
                            warn!(path = %path.display(), error = %e, "Checkpoint failed");
                            events.push(SessionEvent::CheckpointFailed(e.to_string()));
                        }
                    }
                }
            }
            session.schedule.mark(now);
        }

        if self.controls.take_reset() {
            session.processor.reset_accumulators();
            info!("Accumulators reset");
        }

        if let Some(rate) = session.processor.tick_fps(now) {
            events.push(SessionEvent::FpsUpdated(rate));
        }

        let mut display = None;
        if let Some(frame) = session.receiver.poll() {
            let params = self.controls.render();
            display = session.processor.process(&frame, &params);
            if display.is_some() {
                session.frames_processed += 1;
            }
        }

        let fps = session.processor.fps();
        self.session = Some(session);
        TickReport { display, fps, events }
    }

    /// Stops a running session and releases the device.
    pub fn shutdown(mut self) -> Result<()> {
        let stopped = self.stop();
        if let Some(source) = self.source.as_mut() {
            source.shutdown()?;
            info!("Camera shut down");
        }
        stopped.map(|_| ())
    }

    fn collect_outcome(&mut self, session: &mut ActiveSession<S>, outcome: ProducerOutcome<S>) {
        session.captured = outcome.captured;
        session.dropped = outcome.dropped;
        if let ProducerExit::DeviceFailed(e) = outcome.exit {
            error!(error = %e, "Acquisition stopped by device error");
            session.fault = Some(e.to_string());
        }
        self.source = Some(outcome.source);
    }
}

impl<S: FrameSource + DeviceControl + 'static, W: CheckpointWriter> SessionController<S, W> {
    /// Pushes device settings; only allowed between sessions.
    pub fn apply_device_settings(&mut self, settings: &DeviceSettings) -> Result<Vec<(&'static str, i32)>> {
        if self.session.is_some() {
            return Err(AcquisitionError::SessionRunning);
        }
        let source = self
            .source
            .as_mut()
            .ok_or_else(|| AcquisitionError::SourceUnavailable("device was lost by a previous session".to_string()))?;
        Ok(settings.apply(source))
    }
}
