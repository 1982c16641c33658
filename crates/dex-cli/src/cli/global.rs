//! Flags accepted by every `dex` subcommand.

use std::path::PathBuf;

use clap::{Args, ArgAction, builder::FalseyValueParser};
use tracing_subscriber::filter::LevelFilter;

/// Global arguments for all commands.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)",
        long_help = "Increase logging verbosity:
    (none)  - Warnings and errors
    -v      - Info level (progress messages)
    -vv     - Debug level (detailed diagnostics)
    -vvv    - Trace level (very verbose)"
    )]
    pub verbose: u8,

    /// Suppress all non-error output, including the banner.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Also set by `NO_COLOR`, whatever its value, unless it is empty or
    /// a falsey word (`0`, `false`, `no`, `off`).
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new(),
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Replaces the user config file; `./dex.toml` still layers on top.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Configuration file path"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Output format"
    )]
    pub output_format: OutputFormat,
}

impl GlobalArgs {
    /// Log level for the workspace crates when `RUST_LOG` is unset.
    ///
    /// `--quiet` wins over any number of `-v`.
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::ERROR;
        }
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Whether stderr may carry ANSI escapes.
    pub fn ansi_stderr(&self) -> bool {
        !self.no_color && std::io::IsTerminal::is_terminal(&std::io::stderr())
    }
}

/// How the CLI should render its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable when stdout is a terminal, plain otherwise.
    #[default]
    Auto,
    /// Human-readable with colors.
    Human,
    /// Plain text without colors.
    Plain,
    /// JSON, for `config list`.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(verbose: u8, quiet: bool) -> GlobalArgs {
        GlobalArgs {
            verbose,
            quiet,
            no_color: true,
            config: None,
            output_format: OutputFormat::Auto,
        }
    }

    #[test]
    fn verbosity_steps_through_levels() {
        let levels: Vec<_> = (0..=4).map(|v| args(v, false).log_level()).collect();
        assert_eq!(
            levels,
            vec![
                LevelFilter::WARN,
                LevelFilter::INFO,
                LevelFilter::DEBUG,
                LevelFilter::TRACE,
                LevelFilter::TRACE,
            ]
        );
    }

    #[test]
    fn quiet_means_errors_only() {
        assert_eq!(args(0, true).log_level(), LevelFilter::ERROR);
        assert_eq!(args(3, true).log_level(), LevelFilter::ERROR);
    }

    #[test]
    fn no_color_disables_ansi() {
        assert!(!args(0, false).ansi_stderr());
    }
}
