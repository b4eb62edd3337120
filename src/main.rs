use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};

use flang_conformance::cli::{self, Args};
use flang_conformance::config::{self, EnvConfig, RunConfiguration};
use flang_conformance::discovery;
use flang_conformance::executor::{CompilerInvoker, ParallelExecutor, SuiteRunner};
use flang_conformance::output::{OutputFormat, ResultFormatter};
use flang_conformance::results::{self, RunSettings, StoredRun};
use flang_conformance::utils::logger::{init_logger, LogLevel};
use flang_conformance::utils::timer::{Phase, Stopwatch};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(LogLevel::from_verbose(args.verbose));

    let result = match args.command {
        cli::Command::Run(run_args) => run_suite(run_args).await,
        cli::Command::List(list_args) => list_fixtures(list_args).map(|()| ExitCode::SUCCESS),
        cli::Command::Env => {
            show_env();
            Ok(ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run_suite(args: cli::RunArgs) -> Result<ExitCode> {
    let config = RunConfiguration::from_env().context("Invalid runner configuration")?;
    let format = OutputFormat::from_str(&args.format)
        .ok_or_else(|| anyhow::anyhow!("Unknown output format: {}", args.format))?;

    let mut stopwatch = Stopwatch::new();
    let fixtures = discovery::discover_with_extension(&config.suite_root, &args.extension)?;
    let fixtures = discovery::filter_fixtures(fixtures, &args.filter);
    if fixtures.is_empty() {
        anyhow::bail!("No fixtures match filters {:?}", args.filter);
    }
    stopwatch.lap(Phase::Discovery);

    let invoker = CompilerInvoker::new(&config.compiler_binary);
    info!(
        "Running {} fixtures from {} with {}",
        fixtures.len(),
        config.suite_root.display(),
        invoker.binary().display()
    );
    let started_at = Utc::now();

    let (summary, settings) = if args.parallel {
        let executor = ParallelExecutor::new(invoker, args.concurrent);
        let settings = RunSettings::parallel(&config, executor.max_concurrent());
        (executor.run_all(&fixtures).await, settings)
    } else {
        let runner = SuiteRunner::new(invoker);
        (runner.run_all(&fixtures).await, RunSettings::sequential(&config))
    };
    stopwatch.lap(Phase::Execution);

    let mut formatter = ResultFormatter::new(format);
    if args.no_color {
        formatter = formatter.no_color();
    }
    println!("{}", formatter.format_summary(&summary));

    let exit_code = summary.exit_code();

    if let Some(output) = args.output {
        let run = StoredRun::new(
            started_at,
            Utc::now(),
            settings.with_filters(&args.filter),
            summary,
        );
        let path = Path::new(&output);
        results::export(&run, path)?;
        stopwatch.lap(Phase::Export);
        eprintln!("📁 Report saved to {}", path.display());
    }

    debug!("Timing: {}", stopwatch.format());

    Ok(if exit_code == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn list_fixtures(args: cli::ListArgs) -> Result<()> {
    let suite_root = config::suite_root_from_env().context("Invalid runner configuration")?;
    let fixtures = discovery::discover_with_extension(&suite_root, &args.extension)?;

    println!("\nFixtures under {}\n", suite_root.display());
    print!(
        "{}",
        ResultFormatter::default().format_fixtures(&fixtures, args.detailed)
    );
    Ok(())
}

fn show_env() {
    config::env::print_env_help();
    println!();

    let env = EnvConfig::load();
    env.print_summary();
    if !env.has_any() {
        println!("\n⚠️  Neither variable is set; `run` will refuse to start.");
    }
}
