//! Acquisition producer: the only code that runs on its own thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{Builder, JoinHandle};

use ndarray::Array2;
use tracing::{error, info, trace};

use crate::camera_pipeline::channel::{FrameSender, PushOutcome};
use crate::camera_pipeline::common::error::{AcquisitionError, Result};
use crate::camera_pipeline::source::{Frame, FrameSource};

/// Why the capture loop ended
#[derive(Debug)]
pub enum ProducerExit {
    /// The keep-running flag was cleared
    Stopped,
    /// The receiving side of the channel was dropped
    ConsumerGone,
    /// The device reported an unrecoverable error; not retried
    DeviceFailed(AcquisitionError),
}

/// Everything the producer thread hands back when it ends
#[derive(Debug)]
pub struct ProducerOutcome<S> {
    /// The source, returned so the next session can reuse it
    pub source: S,
    pub captured: u64,
    pub dropped: u64,
    pub exit: ProducerExit,
}

/// Thread creation failed before any capture; the device is handed back.
pub struct SpawnError<S> {
    pub error: AcquisitionError,
    pub source: Option<S>,
}

impl<S> std::fmt::Debug for SpawnError<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpawnError")
            .field("error", &self.error)
            .field("source_returned", &self.source.is_some())
            .finish()
    }
}

pub struct AcquisitionProducer<S> {
    handle: JoinHandle<Option<ProducerOutcome<S>>>,
    keep_running: Arc<AtomicBool>,
}

impl<S: FrameSource + 'static> AcquisitionProducer<S> {
    /// Moves `source` onto a new thread that captures until stopped.
    pub fn spawn(source: S, sender: FrameSender) -> std::result::Result<Self, SpawnError<S>> {
        Self::spawn_with(Builder::new().name("acquisition".to_string()), source, sender)
    }

    fn spawn_with(builder: Builder, source: S, sender: FrameSender) -> std::result::Result<Self, SpawnError<S>> {
        let keep_running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&keep_running);

        // The thread takes the source out of the slot; a failed spawn leaves it there.
        let slot = Arc::new(Mutex::new(Some(source)));
        let handoff = Arc::clone(&slot);

        let spawned = builder.spawn(move || {
            let source = handoff.lock().unwrap_or_else(|p| p.into_inner()).take();
            source.map(|source| capture_loop(source, sender, flag))
        });

        match spawned {
            Ok(handle) => Ok(Self { handle, keep_running }),
            Err(e) => {
                error!(error = %e, "Could not start acquisition thread");
                let source = slot.lock().unwrap_or_else(|p| p.into_inner()).take();
                Err(SpawnError { error: e.into(), source })
            }
        }
    }

    /// True once the capture loop has exited, for whatever reason.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Clears the keep-running flag and waits for the thread.
    ///
    /// A capture call already in flight is not interrupted, so this returns only
    /// after the device delivers (or fails) that last frame.
    pub fn join(self) -> Result<ProducerOutcome<S>> {
        self.keep_running.store(false, Ordering::Release);
        self.handle
            .join()
            .map_err(|_| AcquisitionError::ProducerPanicked)?
            .ok_or(AcquisitionError::ProducerPanicked)
    }
}

fn capture_loop<S: FrameSource>(
    mut source: S,
    sender: FrameSender,
    keep_running: Arc<AtomicBool>,
) -> ProducerOutcome<S> {
    let dimensions = source.dimensions();
    let mut captured = 0u64;
    let mut dropped = 0u64;
    let mut exit = ProducerExit::Stopped;

    info!(width = dimensions.width, height = dimensions.height, "Image acquisition started");

    while keep_running.load(Ordering::Acquire) {
        // Fresh buffer per frame: the previous one may still sit in the channel.
        let mut pixels = Array2::<i16>::zeros(dimensions.shape());
        if let Err(e) = source.capture_into(&mut pixels) {
            error!(error = %e, "Image acquisition will stop");
            exit = ProducerExit::DeviceFailed(e);
            break;
        }

        let frame = Frame { sequence: captured, pixels };
        captured += 1;

        match sender.offer(frame) {
            PushOutcome::Enqueued => {}
            PushOutcome::Dropped => {
                dropped += 1;
                trace!(sequence = captured - 1, "Frame channel full, frame dropped");
            }
            PushOutcome::Disconnected => {
                exit = ProducerExit::ConsumerGone;
                break;
            }
        }
    }

    info!(captured, dropped, "Image acquisition has stopped");
    ProducerOutcome { source, captured, dropped, exit }
}
