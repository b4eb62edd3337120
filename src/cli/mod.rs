//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

use crate::discovery::FIXTURE_EXTENSION;

/// Conformance runner for the flang compiler
#[derive(Parser, Debug)]
#[command(name = "flang-conformance")]
#[command(author = "hephaex@gmail.com")]
#[command(version)]
#[command(about = "Run .flang fixtures against a compiler and report outcomes")]
#[command(
    long_about = "Discovers fixtures under $TEST_SUITE_ROOT and runs each one as \
                  `$COMPILER_BINARY <fixture>`. Exit status 0 passes a fixture."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the conformance suite
    Run(RunArgs),

    /// List discovered fixtures
    List(ListArgs),

    /// Show the environment variables the runner reads
    Env,
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Run fixtures in parallel
    #[arg(short, long)]
    pub parallel: bool,

    /// Number of concurrent compiler processes (when parallel)
    #[arg(short, long, default_value = "4")]
    pub concurrent: usize,

    /// Output format (table, json, json-pretty, csv, summary)
    #[arg(short, long, default_value = "table")]
    pub format: String,

    /// Only run fixtures whose identifier contains this text (repeatable)
    #[arg(long)]
    pub filter: Vec<String>,

    /// Fixture file extension
    #[arg(short, long, default_value = FIXTURE_EXTENSION)]
    pub extension: String,

    /// Save the run report to a file (.json, .yaml or .csv)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show skip markers and absolute paths
    #[arg(short, long)]
    pub detailed: bool,

    /// Fixture file extension
    #[arg(short, long, default_value = FIXTURE_EXTENSION)]
    pub extension: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["flang-conformance", "list", "--detailed"]);
        match args.command {
            Command::List(list_args) => {
                assert!(list_args.detailed);
                assert_eq!(list_args.extension, "flang");
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_run_defaults() {
        let args = Args::parse_from(["flang-conformance", "run"]);
        assert!(!args.verbose);
        match args.command {
            Command::Run(run_args) => {
                assert!(!run_args.parallel);
                assert_eq!(run_args.concurrent, 4);
                assert_eq!(run_args.format, "table");
                assert!(run_args.filter.is_empty());
                assert!(run_args.output.is_none());
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_run_args() {
        let args = Args::parse_from([
            "flang-conformance",
            "run",
            "--parallel",
            "--concurrent",
            "8",
            "--filter",
            "lexer",
            "--filter",
            "parser/",
            "--output",
            "report.yaml",
            "-v",
        ]);
        assert!(args.verbose);
        match args.command {
            Command::Run(run_args) => {
                assert!(run_args.parallel);
                assert_eq!(run_args.concurrent, 8);
                assert_eq!(run_args.filter, vec!["lexer", "parser/"]);
                assert_eq!(run_args.output.as_deref(), Some("report.yaml"));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_env_command() {
        let args = Args::parse_from(["flang-conformance", "env"]);
        assert!(matches!(args.command, Command::Env));
    }
}
