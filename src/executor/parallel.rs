//! Parallel test execution
//!
//! Runs independent fixtures concurrently, bounded by a semaphore.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use super::invoker::Invoke;
use super::runner::run_fixture;
use crate::models::{ExecutionOutcome, Fixture, RunSummary};

/// Parallel fixture executor
pub struct ParallelExecutor<I> {
    invoker: Arc<I>,
    max_concurrent: usize,
}

impl<I: Invoke + 'static> ParallelExecutor<I> {
    pub fn new(invoker: I, max_concurrent: usize) -> Self {
        Self {
            invoker: Arc::new(invoker),
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    /// Run fixtures concurrently
    ///
    /// Each task owns its fixture and its own output buffer. Outcomes are
    /// returned in discovery order regardless of completion order.
    pub async fn run_fixtures(&self, fixtures: &[Fixture]) -> Vec<ExecutionOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut handles = Vec::with_capacity(fixtures.len());

        for fixture in fixtures.iter().cloned() {
            let semaphore = semaphore.clone();
            let invoker = self.invoker.clone();

            let handle = tokio::spawn(async move {
                // The semaphore is never closed.
                let _permit = semaphore.acquire_owned().await.ok();

                debug!("Starting parallel execution of {}", fixture);
                run_fixture(invoker.as_ref(), &fixture).await
            });

            handles.push(handle);
        }

        // join_all yields in the order the handles were pushed.
        join_all(handles)
            .await
            .into_iter()
            .zip(fixtures)
            .map(|(joined, fixture)| match joined {
                Ok(outcome) => outcome,
                // A panicking task still gets an outcome for its fixture.
                Err(e) => ExecutionOutcome::capture_error(fixture.clone(), 0, e),
            })
            .collect()
    }

    /// Run all fixtures in parallel and summarize
    pub async fn run_all(&self, fixtures: &[Fixture]) -> RunSummary {
        info!(
            "Running {} fixtures in parallel (max {} concurrent)",
            fixtures.len(),
            self.max_concurrent
        );

        let start = Instant::now();
        let summary = RunSummary::new(self.run_fixtures(fixtures).await);

        info!(
            "Parallel execution completed in {}ms - Pass: {} | Fail: {} | Skip: {}",
            start.elapsed().as_millis(),
            summary.passed,
            summary.failed,
            summary.skipped
        );

        summary
    }
}
