use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// Frames processed per ~1 s window.
///
/// The published rate is the count of the last completed window; the count
/// restarts whenever a window closes.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_start: Instant,
    frames_in_window: u32,
    rate: u32,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames_in_window: 0,
            rate: 0,
        }
    }

    pub fn record_frame(&mut self) {
        self.frames_in_window += 1;
    }

    /// Closes the window once it is older than a second and returns the new rate.
    pub fn tick(&mut self, now: Instant) -> Option<u32> {
        if now.saturating_duration_since(self.window_start) <= WINDOW {
            return None;
        }
        self.rate = self.frames_in_window;
        self.frames_in_window = 0;
        self.window_start = now;
        Some(self.rate)
    }

    pub fn rate(&self) -> u32 {
        self.rate
    }
}
