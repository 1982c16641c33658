//! Output management and formatting.
//!
//! Everything the user reads on stdout goes through [`OutputManager`], so
//! `--quiet`, `--no-color` and the resolved output format are honoured in
//! one place.  Errors are rendered separately by `main`.

use std::io::{self, IsTerminal};
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use dex_core::domain::{PackageManager, ProjectName};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

const LOGO: &str = r"
██████╗ ███████╗██╗  ██╗
██╔══██╗██╔════╝╚██╗██╔╝
██║  ██║█████╗   ╚███╔╝
██║  ██║██╔══╝   ██╔██╗
██████╔╝███████╗██╔╝ ██╗
╚═════╝ ╚══════╝╚═╝  ╚═╝
";

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    banner: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Auto becomes Human on a TTY and Plain when piped.
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            banner: config.output.banner,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Machine-readable payload.  Written even in quiet mode.
    pub fn data(&self, payload: &str) -> io::Result<()> {
        self.term.write_line(payload)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}")
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}")
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}")
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Welcome text and logo, unless disabled in config.
    pub fn banner(&self) -> io::Result<()> {
        if !self.banner {
            return Ok(());
        }
        self.header("Welcome to Dex!")?;
        self.header(LOGO)
    }

    /// Closing summary after a successful scaffold.
    pub fn next_steps(
        &self,
        name: &ProjectName,
        package_manager: PackageManager,
        installed: bool,
    ) -> io::Result<()> {
        let dev = package_manager.run_script("dev");
        let command = |cmd: &str| {
            if self.no_color {
                format!("  {cmd}")
            } else {
                format!("  {}", cmd.cyan())
            }
        };

        self.print("")?;
        self.print("Inside that directory, you can run:")?;
        self.print("")?;
        self.print(&command(&dev))?;
        self.print("    Starts the development server.")?;
        self.print("")?;
        self.print("We suggest that you begin by typing:")?;
        self.print("")?;
        self.print(&command(&format!("cd {name}")))?;
        if !installed {
            let (program, args) = package_manager.install_command();
            let install = std::iter::once(program)
                .chain(args)
                .collect::<Vec<_>>()
                .join(" ");
            self.print(&command(&install))?;
        }
        self.print(&command(&dev))?;
        self.print("")
    }

    /// Spinner on stderr for a blocking step.
    ///
    /// Hidden in quiet mode and when stderr is not a terminal; callers
    /// finish it either way.
    pub fn spinner(&self, msg: impl Into<String>) -> ProgressBar {
        let msg = msg.into();
        if self.quiet || !io::stderr().is_terminal() {
            return ProgressBar::hidden();
        }

        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let bar = ProgressBar::new_spinner().with_style(style).with_message(msg);
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
