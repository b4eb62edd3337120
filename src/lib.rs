//! flang conformance runner
//!
//! Discovers `.flang` fixtures under a suite root, runs the compiler under
//! test once per fixture and reports one outcome per fixture.
//!
//! ## Environment
//!
//! - `TEST_SUITE_ROOT`: directory holding the fixture tree
//! - `COMPILER_BINARY`: compiler executable, invoked as `<compiler> <fixture>`
//!
//! A fixture passes when the compiler exits with status 0. Files named
//! `name.skip.flang` are reported as skipped and never handed to the compiler.
//!
//! ## Usage
//!
//! ```bash
//! # Run the whole suite
//! flang-conformance run
//!
//! # Run in parallel and save a report
//! flang-conformance run --parallel --concurrent 8 --output report.json
//!
//! # List discovered fixtures
//! flang-conformance list --detailed
//!
//! # Run under libtest
//! cargo test --test conformance
//! ```

pub mod cli;
pub mod config;
pub mod discovery;
pub mod executor;
pub mod harness;
pub mod models;
pub mod output;
pub mod results;
pub mod utils;
