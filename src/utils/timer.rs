//! Timing helpers for fixture runs and run phases.

use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;

/// Measures one compiler invocation
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    fixture: String,
}

impl Timer {
    pub fn start(fixture: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            fixture: fixture.into(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop and return whole milliseconds, saturating at `u64::MAX`
    pub fn stop_ms(self) -> u64 {
        let ms = u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!("{} finished in {}ms", self.fixture, ms);
        ms
    }
}

/// Phases of a run measured by [`Stopwatch`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Discovery,
    Execution,
    Export,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Discovery => "discovery",
            Phase::Execution => "execution",
            Phase::Export => "export",
        };
        f.write_str(name)
    }
}

/// Records when each phase of a run ended
#[derive(Debug)]
pub struct Stopwatch {
    start: Instant,
    marks: Vec<(Phase, Duration)>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            marks: Vec::new(),
        }
    }

    /// Mark the end of `phase`
    pub fn lap(&mut self, phase: Phase) {
        self.marks.push((phase, self.start.elapsed()));
    }

    pub fn total(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time spent in each phase, in the order they were marked
    pub fn phases(&self) -> Vec<(Phase, Duration)> {
        let mut previous = Duration::ZERO;
        self.marks
            .iter()
            .map(|&(phase, mark)| {
                let spent = mark.saturating_sub(previous);
                previous = mark;
                (phase, spent)
            })
            .collect()
    }

    /// e.g. `discovery: 3ms, execution: 120ms (total 123ms)`
    pub fn format(&self) -> String {
        let phases: Vec<_> = self
            .phases()
            .into_iter()
            .map(|(phase, spent)| format!("{phase}: {}ms", spent.as_millis()))
            .collect();
        format!("{} (total {}ms)", phases.join(", "), self.total().as_millis())
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
