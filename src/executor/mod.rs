//! Fixture execution engine
//!
//! Provides compiler invocation plus sequential and parallel execution.

mod invoker;
mod parallel;
mod runner;

pub use invoker::{CompilerInvoker, Invocation, Invoke, InvokeError};
pub use parallel::ParallelExecutor;
pub use runner::{run_fixture, SuiteRunner};

#[cfg(test)]
pub(crate) use runner::test_support;
