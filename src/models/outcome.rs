//! Outcome models
//!
//! Defines per-fixture outcomes and the run summary built from them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Fixture;

/// Terminal classification of a fixture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Passed,
    Skipped,
    Failed,
}

impl OutcomeStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            OutcomeStatus::Passed => "✓",
            OutcomeStatus::Skipped => "○",
            OutcomeStatus::Failed => "✗",
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, OutcomeStatus::Failed)
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeStatus::Passed => write!(f, "PASS"),
            OutcomeStatus::Skipped => write!(f, "SKIP"),
            OutcomeStatus::Failed => write!(f, "FAIL"),
        }
    }
}

/// Why a fixture failed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The compiler ran and exited non-zero (or was killed)
    NonZeroExit,
    /// The compiler could not be started at all
    Spawn,
    /// The compiler started but its output or exit status was lost
    Capture,
}

/// Result of running one fixture
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub fixture: Fixture,
    pub status: OutcomeStatus,
    pub duration_ms: u64,
    pub exit_code: Option<i32>,
    pub message: Option<String>,
    pub captured_output: Option<String>,
    pub failure: Option<FailureKind>,
}

impl ExecutionOutcome {
    pub fn passed(fixture: Fixture, duration_ms: u64) -> Self {
        Self {
            fixture,
            status: OutcomeStatus::Passed,
            duration_ms,
            exit_code: Some(0),
            message: None,
            captured_output: None,
            failure: None,
        }
    }

    pub fn skipped(fixture: Fixture, reason: impl Into<String>) -> Self {
        Self {
            fixture,
            status: OutcomeStatus::Skipped,
            duration_ms: 0,
            exit_code: None,
            message: Some(reason.into()),
            captured_output: None,
            failure: None,
        }
    }

    /// The compiler ran and reported failure
    pub fn failed(
        fixture: Fixture,
        duration_ms: u64,
        exit_code: Option<i32>,
        output: impl Into<String>,
    ) -> Self {
        let message = format!("[Execution Error] {}", fixture.id);
        Self {
            fixture,
            status: OutcomeStatus::Failed,
            duration_ms,
            exit_code,
            message: Some(message),
            captured_output: Some(output.into()),
            failure: Some(FailureKind::NonZeroExit),
        }
    }

    /// The compiler could not be started
    pub fn spawn_error(fixture: Fixture, error: impl fmt::Display) -> Self {
        let message = format!("[Spawn Error] {}: {}", fixture.id, error);
        Self {
            fixture,
            status: OutcomeStatus::Failed,
            duration_ms: 0,
            exit_code: None,
            message: Some(message),
            captured_output: None,
            failure: Some(FailureKind::Spawn),
        }
    }

    /// The compiler started but could not be observed to completion
    pub fn capture_error(fixture: Fixture, duration_ms: u64, error: impl fmt::Display) -> Self {
        let message = format!("[Capture Error] {}: {}", fixture.id, error);
        Self {
            fixture,
            status: OutcomeStatus::Failed,
            duration_ms,
            exit_code: None,
            message: Some(message),
            captured_output: None,
            failure: Some(FailureKind::Capture),
        }
    }

    /// Human-readable failure report with the captured output attached
    pub fn failure_report(&self) -> Option<String> {
        if self.status != OutcomeStatus::Failed {
            return None;
        }
        let message = self.message.as_deref().unwrap_or_default();
        Some(match &self.captured_output {
            Some(output) => format!("{message}\n\n----- CAPTURED OUTPUT -----\n{output}"),
            None => message.to_string(),
        })
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}ms]",
            self.status.symbol(),
            self.fixture,
            self.duration_ms
        )?;
        match self.status {
            OutcomeStatus::Skipped => {
                if let Some(msg) = &self.message {
                    write!(f, " - {msg}")?;
                }
            }
            OutcomeStatus::Failed => match self.exit_code {
                Some(code) => write!(f, " - exit code {code}")?,
                None => match self.failure {
                    Some(FailureKind::Spawn) => write!(f, " - could not spawn compiler")?,
                    Some(FailureKind::Capture) => write!(f, " - lost track of compiler")?,
                    _ => write!(f, " - terminated by signal")?,
                },
            },
            OutcomeStatus::Passed => {}
        }
        Ok(())
    }
}

/// Summary of one run over the suite
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total_duration_ms: u64,
    pub outcomes: Vec<ExecutionOutcome>,
}

impl RunSummary {
    pub fn new(outcomes: Vec<ExecutionOutcome>) -> Self {
        let count = |status: OutcomeStatus| outcomes.iter().filter(|o| o.status == status).count();
        let passed = count(OutcomeStatus::Passed);
        let skipped = count(OutcomeStatus::Skipped);
        let failed = count(OutcomeStatus::Failed);
        let total_duration_ms = outcomes.iter().map(|o| o.duration_ms).sum();

        Self {
            total: outcomes.len(),
            passed,
            skipped,
            failed,
            total_duration_ms,
            outcomes,
        }
    }

    /// Percentage of executed (non-skipped) fixtures that passed
    pub fn pass_rate(&self) -> f64 {
        let executed = self.passed + self.failed;
        if executed == 0 {
            0.0
        } else {
            (self.passed as f64 / executed as f64) * 100.0
        }
    }

    /// No fixture failed
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Process exit code for this run
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &ExecutionOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Failed)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for outcome in &self.outcomes {
            writeln!(f, "  {outcome}")?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Total: {} | Pass: {} | Fail: {} | Skip: {}",
            self.total, self.passed, self.failed, self.skipped
        )?;
        writeln!(
            f,
            "Pass Rate: {:.1}% | Duration: {}ms",
            self.pass_rate(),
            self.total_duration_ms
        )
    }
}
