//! Run report persistence
//!
//! Exports a finished run as JSON, YAML or CSV, chosen by file extension.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::RunConfiguration;
use crate::models::RunSummary;
use crate::output::write_csv;

/// A finished run together with the settings that produced it
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredRun {
    /// Run ID derived from the start timestamp
    pub id: String,

    /// Timestamp when the run started
    pub started_at: DateTime<Utc>,

    /// Timestamp when the run completed
    pub completed_at: DateTime<Utc>,

    /// Run settings
    pub config: RunSettings,

    /// Environment info
    pub environment: EnvironmentInfo,

    /// Counts and per-fixture outcomes
    pub summary: RunSummary,
}

/// Settings a run was executed with
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSettings {
    pub suite_root: PathBuf,
    pub compiler_binary: PathBuf,

    /// Whether fixtures ran in parallel
    pub parallel: bool,

    /// Concurrency level (1 when sequential)
    pub concurrency: usize,

    /// Substring filters applied to identifiers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<String>,
}

impl RunSettings {
    pub fn sequential(config: &RunConfiguration) -> Self {
        Self {
            suite_root: config.suite_root.clone(),
            compiler_binary: config.compiler_binary.clone(),
            parallel: false,
            concurrency: 1,
            filters: Vec::new(),
        }
    }

    pub fn parallel(config: &RunConfiguration, concurrency: usize) -> Self {
        Self {
            parallel: true,
            concurrency: concurrency.max(1),
            ..Self::sequential(config)
        }
    }

    pub fn with_filters(mut self, filters: &[String]) -> Self {
        self.filters = filters.to_vec();
        self
    }
}

/// Environment information
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    /// Operating system
    pub os: String,

    /// Architecture
    pub arch: String,

    /// Tool version
    pub tool_version: String,
}

impl Default for EnvironmentInfo {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl StoredRun {
    pub fn new(
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        config: RunSettings,
        summary: RunSummary,
    ) -> Self {
        Self {
            id: run_id(&started_at),
            started_at,
            completed_at,
            config,
            environment: EnvironmentInfo::default(),
            summary,
        }
    }
}

fn run_id(started_at: &DateTime<Utc>) -> String {
    started_at.format("%Y%m%d-%H%M%S").to_string()
}

/// Report file formats
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
    Csv,
}

impl ExportFormat {
    /// Pick a format from the file extension, JSON when unrecognized
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => ExportFormat::Yaml,
            Some("csv") => ExportFormat::Csv,
            _ => ExportFormat::Json,
        }
    }
}

/// Write a run report to `path`
///
/// CSV reports carry one row per fixture outcome and drop run metadata.
pub fn export(run: &StoredRun, path: &Path) -> Result<ExportFormat> {
    let format = ExportFormat::from_path(path);
    let file = File::create(path)
        .with_context(|| format!("Failed to create report file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, run).context("Failed to write JSON report")?
        }
        ExportFormat::Yaml => {
            let yaml = serde_yaml::to_string(run).context("Failed to serialize YAML report")?;
            writer
                .write_all(yaml.as_bytes())
                .context("Failed to write YAML report")?;
        }
        ExportFormat::Csv => write_csv(&run.summary.outcomes, &mut writer, true)
            .context("Failed to write CSV report")?,
    }

    writer.flush().context("Failed to flush report")?;
    info!("Saved run {} to {}", run.id, path.display());
    Ok(format)
}

/// Load a JSON or YAML report written by [`export`]
pub fn load(path: &Path) -> Result<StoredRun> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open report file {}", path.display()))?;
    let reader = BufReader::new(file);

    let run = match ExportFormat::from_path(path) {
        ExportFormat::Json => serde_json::from_reader(reader).context("Failed to parse JSON report")?,
        ExportFormat::Yaml => serde_yaml::from_reader(reader).context("Failed to parse YAML report")?,
        ExportFormat::Csv => anyhow::bail!("CSV reports cannot be loaded back: {}", path.display()),
    };

    debug!("Loaded run report from {}", path.display());
    Ok(run)
}
