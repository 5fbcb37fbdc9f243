use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: &'static str,
    pub duration: Duration,
}

/// Durations of each processing stage for one frame
#[derive(Debug, Clone, Default)]
pub struct StageTimings {
    steps: Vec<StepTiming>,
}

impl StageTimings {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn add_step(&mut self, name: &'static str, duration: Duration) {
        self.steps.push(StepTiming { name, duration });
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn get_step(&self, name: &str) -> Option<Duration> {
        self.steps.iter().find(|s| s.name == name).map(|s| s.duration)
    }

    /// One-line `name=1.234ms` summary for trace logging.
    pub fn summary(&self) -> String {
        self.steps
            .iter()
            .map(|s| format!("{}={:.3}ms", s.name, s.duration.as_secs_f64() * 1000.0))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub struct Timer {
    start: Instant,
    name: &'static str,
}

impl Timer {
    pub fn start(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    pub fn stop_into(self, timings: &mut StageTimings) {
        timings.add_step(self.name, self.start.elapsed());
    }
}
