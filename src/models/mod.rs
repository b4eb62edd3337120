//! Data models for conformance runs
//!
//! This module contains the fixture and outcome types shared by discovery,
//! execution and reporting.

mod fixture;
mod outcome;

pub use fixture::Fixture;
pub use outcome::{ExecutionOutcome, FailureKind, OutcomeStatus, RunSummary};
