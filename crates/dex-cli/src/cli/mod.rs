//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "dex",
    bin_name = "dex",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Scaffold Express backends in seconds",
    long_about = "Dex creates a ready-to-run Express project (JavaScript or \
                  TypeScript), optionally wired to MongoDB through mongoose.",
    after_help = "EXAMPLES:\n\
        \x20 dex new\n\
        \x20 dex new my-api --lang ts --pm pnpm --db\n\
        \x20 dex new my-api --yes --skip-install\n\
        \x20 dex completions bash > ~/.local/share/bash-completion/completions/dex",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project from a template.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "Missing answers are prompted for; pass --yes to take the \
            configured defaults instead.\n\n\
            EXAMPLES:\n\
            \x20 dex new shop-api --lang js --pm npm --no-db\n\
            \x20 dex new shop-api --lang ts --pm yarn --db --dir ~/code\n\
            \x20 dex new shop-api --yes --dry-run"
    )]
    New(NewArgs),

    /// List available templates.
    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 dex list\n\
            \x20 dex list --templates-dir ./my-templates\n\
            \x20 dex list --format json"
    )]
    List(ListArgs),

    /// Initialise a Dex configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 dex init           # user config directory\n\
            \x20 dex init --local   # ./dex.toml in the current directory\n\
            \x20 dex init --force   # overwrite an existing file"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 dex completions bash > ~/.local/share/bash-completion/completions/dex\n\
            \x20 dex completions zsh  > ~/.zfunc/_dex\n\
            \x20 dex completions fish > ~/.config/fish/completions/dex.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Dex configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 dex config get defaults.package_manager\n\
            \x20 dex config list\n\
            \x20 dex config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `dex new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name; becomes the directory name and the package name.
    #[arg(value_name = "NAME", help = "Project name (lower-case, digits, '-', '_', '.')")]
    pub name: Option<String>,

    #[arg(
        short = 'l',
        long = "lang",
        value_name = "LANGUAGE",
        value_enum,
        help = "Source language"
    )]
    pub language: Option<LanguageArg>,

    #[arg(
        short = 'p',
        long = "pm",
        value_name = "PACKAGE_MANAGER",
        value_enum,
        help = "Package manager used to install dependencies"
    )]
    pub package_manager: Option<PackageManagerArg>,

    /// Wire in MongoDB through mongoose.
    #[arg(long = "db", overrides_with = "no_db", help = "Add the MongoDB connection module")]
    pub db: bool,

    #[arg(long = "no-db", overrides_with = "db", help = "Do not add MongoDB")]
    pub no_db: bool,

    /// Directory the project is created in.
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIR",
        help = "Parent directory (default: current directory)"
    )]
    pub dir: Option<PathBuf>,

    #[arg(
        long = "templates-dir",
        value_name = "DIR",
        help = "Directory containing the js/ and ts/ templates"
    )]
    pub templates_dir: Option<PathBuf>,

    #[arg(long = "skip-install", help = "Do not run the package manager afterwards")]
    pub skip_install: bool,

    /// Never prompt; use configured defaults for anything not given.
    #[arg(short = 'y', long = "yes", help = "Accept defaults without prompting")]
    pub yes: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

impl NewArgs {
    /// The database choice given on the command line, if any.
    pub fn database(&self) -> Option<bool> {
        match (self.db, self.no_db) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `dex list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(
        long = "templates-dir",
        value_name = "DIR",
        help = "Directory containing the js/ and ts/ templates"
    )]
    pub templates_dir: Option<PathBuf>,

    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Aligned columns with availability markers.
    Table,
    /// One template id per line.
    List,
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `dex init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write `dex.toml` in the current directory.
    #[arg(long = "local", help = "Create local configuration in current directory")]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `dex completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `dex config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.language`.
        key: String,
    },
    /// Print the effective configuration.
    List,
    /// Print the path to the configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Source language as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    #[value(name = "js", alias = "javascript")]
    JavaScript,
    #[value(name = "ts", alias = "typescript")]
    TypeScript,
}

impl From<LanguageArg> for dex_core::domain::Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::JavaScript => Self::JavaScript,
            LanguageArg::TypeScript => Self::TypeScript,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum PackageManagerArg {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl From<PackageManagerArg> for dex_core::domain::PackageManager {
    fn from(arg: PackageManagerArg) -> Self {
        match arg {
            PackageManagerArg::Npm => Self::Npm,
            PackageManagerArg::Pnpm => Self::Pnpm,
            PackageManagerArg::Yarn => Self::Yarn,
            PackageManagerArg::Bun => Self::Bun,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};
    use dex_core::domain::{Language, PackageManager};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_full_new_command() {
        let cli = Cli::parse_from([
            "dex", "new", "shop-api", "--lang", "ts", "--pm", "pnpm", "--db", "--dir", "/tmp",
            "--skip-install",
        ]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert_eq!(args.name.as_deref(), Some("shop-api"));
        assert_eq!(args.language.map(Language::from), Some(Language::TypeScript));
        assert_eq!(
            args.package_manager.map(PackageManager::from),
            Some(PackageManager::Pnpm)
        );
        assert_eq!(args.database(), Some(true));
        assert!(args.skip_install);
    }

    #[test]
    fn new_without_arguments_leaves_everything_to_prompts() {
        let cli = Cli::parse_from(["dex", "new"]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert!(args.name.is_none());
        assert!(args.language.is_none());
        assert_eq!(args.database(), None);
    }

    #[test]
    fn language_long_names_are_aliases() {
        let cli = Cli::parse_from(["dex", "new", "x", "-l", "javascript"]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert_eq!(args.language, Some(LanguageArg::JavaScript));
    }

    #[test]
    fn last_database_flag_wins() {
        let cli = Cli::parse_from(["dex", "new", "x", "--db", "--no-db"]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert_eq!(args.database(), Some(false));
    }

    #[test]
    fn unknown_package_manager_is_rejected() {
        assert!(Cli::try_parse_from(["dex", "new", "x", "--pm", "cargo"]).is_err());
    }

    #[test]
    fn list_defaults_to_table() {
        let cli = Cli::parse_from(["dex", "ls"]);
        let Commands::List(args) = cli.command else {
            panic!("expected List command");
        };
        assert_eq!(args.format, ListFormat::Table);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["dex", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
