//! aoc-native - solve an Advent of Code puzzle with the native solver
//!
//! Reads the puzzle input from stdin, prints the answer on stdout. Failures
//! go to stderr with a non-zero exit code.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod embedded;
mod error;
mod output;

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use aoc_native_loader::{LoaderConfig, MatchPolicy, NativeSolver};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "aoc-native")]
#[command(about = "Solve an Advent of Code puzzle with the native solver")]
#[command(version)]
#[command(allow_negative_numbers = true)]
#[command(long_about = "
aoc-native loads the precompiled solver library for this platform and runs it
on the puzzle input read from standard input.

Set AOC_NATIVE_BASE_NAME, AOC_NATIVE_MATCH_POLICY or AOC_NATIVE_RESOURCE_DIR to
override the loader defaults; command-line flags take precedence.
")]
struct Cli {
    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Fall back to x86_64 for unrecognized architectures
    #[arg(long)]
    permissive: bool,

    /// Load artifacts from this directory instead of the embedded ones
    #[arg(long, value_name = "DIR")]
    library_dir: Option<PathBuf>,

    /// Artifact base name
    #[arg(long, value_name = "NAME")]
    base_name: Option<String>,

    /// Print the artifact filename for this platform and exit
    #[arg(long)]
    print_library_name: bool,

    /// Puzzle year, e.g. 2019
    #[arg(required_unless_present = "print_library_name")]
    year: Option<i32>,

    /// Puzzle day (1-25)
    #[arg(required_unless_present = "print_library_name")]
    day: Option<i32>,

    /// Puzzle part (1 or 2)
    #[arg(required_unless_present = "print_library_name")]
    part: Option<i32>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("aoc_native={log_level},aoc_native_loader={log_level}").into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error_human(&e);
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let solver = build_solver(cli)?;

    if cli.print_library_name {
        let name = solver.library_name().map_err(CliError::from)?;
        output::print_answer(&name);
        return Ok(());
    }

    let (Some(year), Some(day), Some(part)) = (cli.year, cli.day, cli.part) else {
        anyhow::bail!("YEAR, DAY and PART are required");
    };

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(CliError::from)?;

    if aoc_native_loader::install_global(solver).is_err() {
        return Err(CliError::AlreadyInstalled.into());
    }
    aoc_native_loader::ensure_loaded().map_err(CliError::from)?;

    let answer = aoc_native_loader::invoke(year, day, part, &input).map_err(CliError::from)?;
    output::print_answer(&answer);
    Ok(())
}

fn build_solver(cli: &Cli) -> Result<NativeSolver, CliError> {
    let config = resolve_config(cli, LoaderConfig::from_env()?)?;

    let mut builder = NativeSolver::builder();
    if config.resource_dir.is_none() {
        builder = builder.resources(embedded::resources());
    }
    Ok(builder.config(config).build())
}

/// Apply command-line overrides on top of `config`.
fn resolve_config(cli: &Cli, mut config: LoaderConfig) -> Result<LoaderConfig, CliError> {
    if cli.permissive {
        config.match_policy = MatchPolicy::Permissive;
    }
    if let Some(base_name) = &cli.base_name {
        config.base_name.clone_from(base_name);
    }
    if let Some(dir) = &cli.library_dir {
        config.resource_dir = Some(dir.clone());
    }
    config.validate()?;
    Ok(config)
}
