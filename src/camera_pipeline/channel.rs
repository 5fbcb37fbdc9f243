//! Two-slot frame channel between the producer thread and the tick context.
//!
//! Both ends are non-blocking. A push into a full channel drops the new frame and
//! keeps the queued ones in FIFO order; a pop from an empty channel returns `None`.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};

use crate::camera_pipeline::source::Frame;

pub const FRAME_CHANNEL_CAPACITY: usize = 2;

/// What happened to a frame offered to the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Enqueued,
    /// Channel was full; the offered frame was discarded
    Dropped,
    /// Consumer side is gone
    Disconnected,
}

pub fn frame_channel() -> (FrameSender, FrameReceiver) {
    let (sender, receiver) = bounded(FRAME_CHANNEL_CAPACITY);
    (FrameSender { sender }, FrameReceiver { receiver })
}

pub struct FrameSender {
    sender: Sender<Frame>,
}

impl FrameSender {
    pub fn offer(&self, frame: Frame) -> PushOutcome {
        match self.sender.try_send(frame) {
            Ok(()) => PushOutcome::Enqueued,
            Err(TrySendError::Full(_)) => PushOutcome::Dropped,
            Err(TrySendError::Disconnected(_)) => PushOutcome::Disconnected,
        }
    }
}

pub struct FrameReceiver {
    receiver: Receiver<Frame>,
}

impl FrameReceiver {
    /// Next queued frame, or `None` when nothing new has arrived.
    pub fn poll(&self) -> Option<Frame> {
        match self.receiver.try_recv() {
            Ok(frame) => Some(frame),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}
