//! Output formatters for run results
//!
//! Provides table, JSON, CSV, and summary output formats.

use anyhow::Result;
use std::io::Write;

use crate::models::{ExecutionOutcome, Fixture, OutcomeStatus, RunSummary};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Csv,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn status_label(&self, status: OutcomeStatus) -> &'static str {
        match (status, self.colorize) {
            (OutcomeStatus::Passed, true) => "\x1b[32m✓ PASS\x1b[0m",
            (OutcomeStatus::Skipped, true) => "\x1b[33m○ SKIP\x1b[0m",
            (OutcomeStatus::Failed, true) => "\x1b[31m✗ FAIL\x1b[0m",
            (OutcomeStatus::Passed, false) => "✓ PASS",
            (OutcomeStatus::Skipped, false) => "○ SKIP",
            (OutcomeStatus::Failed, false) => "✗ FAIL",
        }
    }

    fn format_outcome_table(&self, outcome: &ExecutionOutcome) -> String {
        format!(
            "{} {:48} [{:>6}ms]",
            self.status_label(outcome.status),
            outcome.fixture.id,
            outcome.duration_ms
        )
    }

    /// Format a whole run
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        match self.format {
            OutputFormat::Table => self.format_summary_table(summary),
            OutputFormat::Json => serde_json::to_string(summary).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(summary).unwrap_or_default(),
            OutputFormat::Csv => csv_string(&summary.outcomes, true),
            OutputFormat::Summary => self.format_summary_brief(summary),
        }
    }

    fn format_summary_table(&self, summary: &RunSummary) -> String {
        let mut output = String::new();

        output.push_str("\n══════════════════════════════════════════════════════════════════\n");
        output.push_str(" Conformance Results\n");
        output.push_str("══════════════════════════════════════════════════════════════════\n");

        for outcome in &summary.outcomes {
            output.push_str(&format!(" {}\n", self.format_outcome_table(outcome)));
        }

        output.push_str("──────────────────────────────────────────────────────────────────\n");

        let fail_str = if self.colorize && summary.failed > 0 {
            format!("\x1b[31m{}\x1b[0m", summary.failed)
        } else {
            summary.failed.to_string()
        };
        output.push_str(&format!(
            " Total: {} | Pass: {} | Fail: {} | Skip: {}\n",
            summary.total, summary.passed, fail_str, summary.skipped
        ));
        output.push_str(&format!(
            " Pass Rate: {:.1}% | Duration: {}ms\n",
            summary.pass_rate(),
            summary.total_duration_ms
        ));

        for outcome in summary.failures() {
            if let Some(report) = outcome.failure_report() {
                output.push_str("\n──────────────────────────────────────────────────────────────────\n");
                output.push_str(&report);
                if !report.ends_with('\n') {
                    output.push('\n');
                }
            }
        }

        output
    }

    fn format_summary_brief(&self, summary: &RunSummary) -> String {
        format!(
            "{}/{} passed, {} failed, {} skipped ({:.1}%) in {}ms",
            summary.passed,
            summary.total,
            summary.failed,
            summary.skipped,
            summary.pass_rate(),
            summary.total_duration_ms
        )
    }

    /// Format discovered fixtures for the `list` command
    pub fn format_fixtures(&self, fixtures: &[Fixture], detailed: bool) -> String {
        let mut output = String::new();
        for fixture in fixtures {
            if detailed {
                let marker = if fixture.is_skipped() { "skip" } else { "run" };
                output.push_str(&format!(
                    "  [{:4}] {:48} {}\n",
                    marker,
                    fixture.id,
                    fixture.path.display()
                ));
            } else {
                output.push_str(&format!("  {}\n", fixture.id));
            }
        }
        output.push_str(&format!("\n{} fixtures\n", fixtures.len()));
        output
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

/// Header of CSV reports
pub const CSV_HEADER: [&str; 6] = [
    "fixture",
    "status",
    "duration_ms",
    "exit_code",
    "message",
    "captured_output",
];

/// Write outcomes as CSV rows
pub fn write_csv<W: Write>(outcomes: &[ExecutionOutcome], writer: W, header: bool) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    if header {
        writer.write_record(CSV_HEADER)?;
    }

    for outcome in outcomes {
        writer.write_record([
            outcome.fixture.id.clone(),
            outcome.status.to_string(),
            outcome.duration_ms.to_string(),
            outcome
                .exit_code
                .map(|c| c.to_string())
                .unwrap_or_default(),
            outcome.message.clone().unwrap_or_default(),
            outcome.captured_output.clone().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn csv_string(outcomes: &[ExecutionOutcome], header: bool) -> String {
    let mut buffer = Vec::new();
    match write_csv(outcomes, &mut buffer, header) {
        Ok(()) => String::from_utf8_lossy(&buffer).into_owned(),
        Err(_) => String::new(),
    }
}
