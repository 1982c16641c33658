//! # Dex CLI
//!
//! Scaffolds a ready-to-run Express backend.
//!
//! ## Startup sequence
//!
//! 1. Load `.env` from the working directory, if any.
//! 2. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 3. Initialise the tracing subscriber (logging).
//! 4. Load configuration (defaults + files + env).
//! 5. Build the [`OutputManager`].
//! 6. Dispatch to the appropriate command handler.
//! 7. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                 |
//! |------|-------------------------|
//! |  0   | Success                 |
//! |  1   | Internal / system error |
//! |  2   | User / input error      |
//! |  3   | Resource not found      |
//! |  4   | Configuration error     |

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod installer;
mod logging;
mod output;
mod prompt;

fn main() -> ExitCode {
    // A missing .env is the common case.
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version land here as well, with exit code 0.
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(if e.use_stderr() { 2 } else { 0 });
        }
    };

    if let Err(e) = init_logging(&cli.global) {
        eprintln!("{e:#}");
        return ExitCode::from(1);
    }

    let verbose = cli.global.verbose > 0;
    debug!(
        command = ?cli.command,
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        "dex starting"
    );

    let config = match AppConfig::load(cli.global.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let err = CliError::ConfigError {
                message: format!("{e:#}"),
                source: None,
            };
            return report(&err, verbose, cli.global.ansi_stderr());
        }
    };

    let colored = cli.global.ansi_stderr() && !config.output.no_color;
    let output = OutputManager::new(&cli.global, &config);

    match run(cli, config, output) {
        Ok(()) => {
            info!("dex finished");
            ExitCode::SUCCESS
        }
        Err(e) => report(&e, verbose, colored),
    }
}

#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cli.command {
        Commands::New(args) => commands::new::execute(args, config, output),
        Commands::List(args) => commands::list::execute(args, config, output),
        Commands::Init(args) => commands::init::execute(args, cli.global, output),
        Commands::Completions(args) => commands::completions::execute(args),
        Commands::Config(cmd) => commands::config::execute(cmd, config, output),
    }
}

/// Print `err` to stderr and turn it into the process exit code.
///
/// Nothing else in the binary writes errors or picks exit codes.
fn report(err: &CliError, verbose: bool, colored: bool) -> ExitCode {
    err.log();
    let msg = if colored {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");
    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
