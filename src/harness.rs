//! libtest integration
//!
//! Turns each discovered fixture into a named libtest trial so the suite
//! can run under `cargo test` with the usual filtering, listing and
//! summary output.

use anyhow::{Context, Result};
use libtest_mimic::{Arguments, Conclusion, Failed, Trial};
use std::sync::Arc;
use tracing::warn;

use crate::config::RunConfiguration;
use crate::discovery::{self, SKIP_REASON};
use crate::executor::{run_fixture, CompilerInvoker, Invoke};
use crate::models::{Fixture, OutcomeStatus};

/// Trial kind shown next to every fixture name
pub const TRIAL_KIND: &str = "exec";

/// One trial per fixture, named by its identifier
///
/// Skip-annotated fixtures are marked ignored. Under `--ignored` or
/// `--include-ignored` they are left out entirely, since libtest would
/// count a forced trial as passed.
pub fn trials<I: Invoke + 'static>(
    fixtures: Vec<Fixture>,
    invoker: I,
    args: &Arguments,
) -> Vec<Trial> {
    let invoker = Arc::new(invoker);
    let forced = args.ignored || args.include_ignored;

    fixtures
        .into_iter()
        .filter(|fixture| {
            let keep = !(forced && fixture.is_skipped());
            if !keep {
                warn!("Skipping {}: {}", fixture, SKIP_REASON);
            }
            keep
        })
        .map(|fixture| {
            let name = fixture.id.clone();
            let ignored = fixture.is_skipped();
            let invoker = invoker.clone();

            Trial::test(name, move || run_trial(invoker.as_ref(), &fixture))
                .with_kind(TRIAL_KIND)
                .with_ignored_flag(ignored)
        })
        .collect()
}

fn run_trial<I: Invoke>(invoker: &I, fixture: &Fixture) -> Result<(), Failed> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start runtime for {}: {e}", fixture.id))?;

    let outcome = runtime.block_on(run_fixture(invoker, fixture));
    match outcome.status {
        OutcomeStatus::Passed | OutcomeStatus::Skipped => Ok(()),
        OutcomeStatus::Failed => Err(outcome.failure_report().unwrap_or_default().into()),
    }
}

/// Resolve configuration, discover, and run every fixture as a trial
///
/// Configuration and discovery errors are returned before any trial runs.
pub fn run_from_env(args: &Arguments) -> Result<Conclusion> {
    let config = RunConfiguration::from_env().context("Invalid runner configuration")?;
    let fixtures = discovery::discover(&config.suite_root)?;
    let invoker = CompilerInvoker::new(&config.compiler_binary);

    Ok(libtest_mimic::run(args, trials(fixtures, invoker, args)))
}
