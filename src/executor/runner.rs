//! Test execution runner
//!
//! Runs fixtures one at a time, in discovery order.

use std::time::Instant;
use tracing::{debug, error, info};

use super::invoker::{Invoke, InvokeError};
use crate::discovery::SKIP_REASON;
use crate::models::{ExecutionOutcome, Fixture, RunSummary};
use crate::utils::timer::Timer;

/// Sequential runner over a fixed set of fixtures
pub struct SuiteRunner<I> {
    invoker: I,
}

impl<I: Invoke> SuiteRunner<I> {
    /// Create a new runner around an invoker
    pub fn new(invoker: I) -> Self {
        Self { invoker }
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    /// Run a single fixture
    pub async fn run_fixture(&self, fixture: &Fixture) -> ExecutionOutcome {
        run_fixture(&self.invoker, fixture).await
    }

    /// Run all fixtures sequentially
    pub async fn run_all(&self, fixtures: &[Fixture]) -> RunSummary {
        info!("Running {} fixtures", fixtures.len());

        let start = Instant::now();
        let mut outcomes = Vec::with_capacity(fixtures.len());

        for fixture in fixtures {
            let outcome = self.run_fixture(fixture).await;
            debug!("  {}", outcome);
            outcomes.push(outcome);
        }

        let summary = RunSummary::new(outcomes);

        info!(
            "Run completed in {}ms - Pass: {} | Fail: {} | Skip: {}",
            start.elapsed().as_millis(),
            summary.passed,
            summary.failed,
            summary.skipped
        );

        summary
    }
}

/// Skip check, spawn, and classification for one fixture
///
/// Never fails: every error is folded into the outcome so the rest of the
/// suite keeps running.
pub async fn run_fixture<I: Invoke>(invoker: &I, fixture: &Fixture) -> ExecutionOutcome {
    if fixture.is_skipped() {
        return ExecutionOutcome::skipped(fixture.clone(), SKIP_REASON);
    }

    let timer = Timer::start(&fixture.id);
    let result = invoker.invoke(&fixture.path).await;
    let duration_ms = timer.stop_ms();

    match result {
        Ok(invocation) if invocation.success() => {
            ExecutionOutcome::passed(fixture.clone(), duration_ms)
        }
        Ok(invocation) => ExecutionOutcome::failed(
            fixture.clone(),
            duration_ms,
            invocation.exit_code,
            invocation.output,
        ),
        Err(InvokeError::Spawn(e)) => {
            error!("Could not start compiler for {}: {}", fixture.id, e);
            ExecutionOutcome::spawn_error(fixture.clone(), e)
        }
        Err(InvokeError::Capture(e)) => {
            error!("Lost compiler output for {}: {}", fixture.id, e);
            ExecutionOutcome::capture_error(fixture.clone(), duration_ms, e)
        }
    }
}


#[cfg(test)]
mod unit_tests {
    use super::test_support::StubInvoker;
    use super::*;
    use crate::models::{FailureKind, OutcomeStatus};
    use std::path::Path;

    fn suite() -> Vec<Fixture> {
        let root = Path::new("/suite");
        vec![
            Fixture::new("/suite/a.flang", root),
            Fixture::new("/suite/b.skip.flang", root),
            Fixture::new("/suite/nested/c.flang", root),
        ]
    }

    #[tokio::test]
    async fn test_passing_compiler() {
        let runner = SuiteRunner::new(StubInvoker::exiting(0, ""));
        let summary = runner.run_all(&suite()).await;

        assert_eq!(summary.passed, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 0);
        assert!(summary.is_success());
    }

    #[tokio::test]
    async fn test_failing_compiler() {
        let runner = SuiteRunner::new(StubInvoker::exiting(1, "ERROR: unexpected token"));
        let summary = runner.run_all(&suite()).await;

        assert_eq!(summary.failed, 2);
        assert_eq!(summary.skipped, 1);
        for outcome in summary.failures() {
            assert_eq!(outcome.failure, Some(FailureKind::NonZeroExit));
            assert_eq!(outcome.exit_code, Some(1));
            assert!(!outcome.captured_output.as_deref().unwrap().is_empty());
        }
        assert_eq!(summary.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_skipped_fixture_never_invokes_compiler() {
        let runner = SuiteRunner::new(StubInvoker::exiting(1, "should not run"));
        let fixture = Fixture::new("/suite/x.skip.flang", Path::new("/suite"));

        let outcome = runner.run_fixture(&fixture).await;
        assert_eq!(outcome.status, OutcomeStatus::Skipped);
        assert_eq!(outcome.message.as_deref(), Some(SKIP_REASON));
        assert_eq!(runner.invoker().calls(), 0);
    }

    #[tokio::test]
    async fn test_outcomes_follow_discovery_order() {
        let runner = SuiteRunner::new(StubInvoker::exiting(0, ""));
        let fixtures = suite();
        let summary = runner.run_all(&fixtures).await;

        let ids: Vec<_> = summary.outcomes.iter().map(|o| o.fixture.id.as_str()).collect();
        assert_eq!(ids, vec!["a.flang", "b.skip.flang", "nested/c.flang"]);
        assert_eq!(
            runner.invoker().seen(),
            vec!["/suite/a.flang", "/suite/nested/c.flang"]
        );
    }

    #[tokio::test]
    async fn test_spawn_failure_does_not_stop_run() {
        let runner = SuiteRunner::new(StubInvoker::unspawnable());
        let summary = runner.run_all(&suite()).await;

        assert_eq!(summary.total, 3);
        assert_eq!(summary.failed, 2);
        assert_eq!(runner.invoker().calls(), 2);
        for outcome in summary.failures() {
            assert_eq!(outcome.failure, Some(FailureKind::Spawn));
            assert!(outcome
                .message
                .as_deref()
                .unwrap()
                .starts_with("[Spawn Error]"));
        }
    }

    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_per_fixture_lines_stay_below_info() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(move || writer.clone())
            .finish();

        let runner = SuiteRunner::new(StubInvoker::exiting(0, ""));
        tracing::subscriber::with_default(subscriber, || {
            tokio_test::block_on(runner.run_all(&suite()));
        });

        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains("Running 3 fixtures"));
        assert!(!text.contains("nested/c.flang"));
    }

    #[tokio::test]
    async fn test_lost_output_is_not_a_spawn_failure() {
        let runner = SuiteRunner::new(StubInvoker::losing_output());
        let summary = runner.run_all(&suite()).await;

        assert_eq!(summary.failed, 2);
        for outcome in summary.failures() {
            assert_eq!(outcome.failure, Some(FailureKind::Capture));
            assert!(outcome
                .message
                .as_deref()
                .unwrap()
                .starts_with("[Capture Error]"));
        }
    }

    #[tokio::test]
    async fn test_two_runs_are_identical() {
        let runner = SuiteRunner::new(StubInvoker::exiting(2, "boom"));
        let first = runner.run_all(&suite()).await;
        let second = runner.run_all(&suite()).await;

        let key = |s: &RunSummary| {
            s.outcomes
                .iter()
                .map(|o| (o.fixture.clone(), o.status, o.captured_output.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(key(&first), key(&second));
    }

    #[test]
    fn test_run_fixture_from_sync_code() {
        let invoker = StubInvoker::exiting(0, "");
        let fixture = Fixture::new("/suite/a.flang", Path::new("/suite"));

        let outcome = tokio_test::block_on(run_fixture(&invoker, &fixture));
        assert_eq!(outcome.status, OutcomeStatus::Passed);
        assert_eq!(outcome.exit_code, Some(0));
        assert_eq!(invoker.calls(), 1);
    }
}
