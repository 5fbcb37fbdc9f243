use std::time::{Duration, Instant};

pub const DEFAULT_CHECKPOINT_INTERVAL: Duration = Duration::from_secs(30);

/// Elapsed-time gate for periodic checkpoints
#[derive(Debug, Clone)]
pub struct CheckpointSchedule {
    interval: Duration,
    last: Instant,
}

impl CheckpointSchedule {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self { interval, last: now }
    }

    pub fn due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last) >= self.interval
    }

    /// Restarts the interval; called whether or not anything was written.
    pub fn mark(&mut self, now: Instant) {
        self.last = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_after_interval_and_rearms() {
        let start = Instant::now();
        let mut schedule = CheckpointSchedule::new(DEFAULT_CHECKPOINT_INTERVAL, start);

        assert!(!schedule.due(start + Duration::from_secs(29)));
        assert!(schedule.due(start + Duration::from_secs(30)));

        schedule.mark(start + Duration::from_secs(31));
        assert!(!schedule.due(start + Duration::from_secs(60)));
        assert!(schedule.due(start + Duration::from_secs(61)));
    }
}
