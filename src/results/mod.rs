//! Run report persistence

mod storage;

pub use storage::{export, load, EnvironmentInfo, ExportFormat, RunSettings, StoredRun};
