//! Errors surfaced by the `dex` binary, with suggestions and exit codes.

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use dex_core::error::DexError;

pub use dex_core::error::ErrorCategory as CoreCategory;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unknown configuration key '{key}'")]
    ConfigKeyNotFound { key: String },

    #[error("Configuration file already exists at {path}")]
    ConfigExists { path: PathBuf },

    // ── Core errors ────────────────────────────────────────────────────────
    /// An error propagated from `dex-core`; it carries its own suggestions.
    #[error("{0}")]
    Core(#[from] DexError),

    // ── System errors ──────────────────────────────────────────────────────
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The user aborted a prompt.
    #[error("Operation cancelled")]
    Cancelled,

    /// Interactive prompting was needed but the build lacks it.
    #[cfg(not(feature = "interactive"))]
    #[error("Feature not available: {feature}")]
    FeatureNotAvailable { feature: &'static str },

    #[error("External command failed: {command}")]
    ExternalCommandFailed {
        command: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {message}"),
                format!(
                    "Check your config file at {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "Run 'dex init --force' to rewrite a default config".into(),
            ],

            Self::ConfigKeyNotFound { key } => vec![
                format!("'{key}' is not a configuration key"),
                "List every key with: dex config list".into(),
            ],

            Self::ConfigExists { path } => vec![
                format!("Edit the existing file: {}", path.display()),
                "Or overwrite it: dex init --force".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {message}"),
                "Check file permissions".into(),
                "Check available disk space".into(),
            ],

            Self::Cancelled => vec!["No changes were made".into()],

            #[cfg(not(feature = "interactive"))]
            Self::FeatureNotAvailable { feature } => vec![
                format!("The '{feature}' feature is not available in this build"),
                "Pass every answer as a flag, or add --yes to use configured defaults".into(),
                format!("Or reinstall with it: cargo install dex-cli --features {feature}"),
            ],

            Self::ExternalCommandFailed { command, .. } => vec![
                format!("'{command}' did not complete"),
                "Ensure the command is installed and in your PATH".into(),
                "Check the command output above for details".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Cancelled | Self::ConfigExists { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            #[cfg(not(feature = "interactive"))]
            Self::FeatureNotAvailable { .. } => ErrorCategory::Configuration,
            Self::ConfigKeyNotFound { .. } => ErrorCategory::NotFound,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } | Self::ExternalCommandFailed { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Coloured report: headline, cause chain when verbose, suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        self.render(verbose, true)
    }

    /// Same report without ANSI escapes.
    pub fn format_plain(&self, verbose: bool) -> String {
        self.render(verbose, false)
    }

    fn render(&self, verbose: bool, colored: bool) -> String {
        let paint = |text: String, style: fn(&str) -> String| {
            if colored { style(&text) } else { text }
        };
        let mut out = String::new();

        let headline = format!("Error: {self}");
        out.push_str(&format!(
            "\n{}\n",
            paint(headline, |t| t.red().bold().to_string())
        ));

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                let line = format!("  Caused by: {err}");
                out.push_str(&format!(
                    "{}\n",
                    paint(line, |t| t.dimmed().to_string())
                ));
                cause = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str(&format!(
                "\n{}\n",
                paint("Suggestions:".into(), |t| t.yellow().bold().to_string())
            ));
            for suggestion in &suggestions {
                out.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            let hint = "Use -v / --verbose for more details.".to_string();
            out.push_str(&format!(
                "\n{}\n",
                paint(hint, |t| t.dimmed().to_string())
            ));
        }

        out
    }

    /// Emit the error as a tracing event; user mistakes are warnings.
    pub fn log(&self) {
        let category = self.category();
        match category {
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                tracing::warn!(?category, error = %self, "command failed");
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(?category, error = %self, "command failed");
            }
        }
        if let Some(source) = self.source() {
            tracing::debug!(cause = %source, "error source");
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    Configuration,
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Extension trait to convert foreign error types into [`CliError`] at
/// call-sites with a descriptive context message.
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for Result<T, toml::ser::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::ConfigError {
            message: f().into(),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dex_core::{application::ApplicationError, domain::DomainError};
    use std::io;

    fn core(err: impl Into<DexError>) -> CliError {
        CliError::Core(err.into())
    }

    // ── exit codes ────────────────────────────────────────────────────────

    #[test]
    fn invalid_project_name_exits_with_user_error() {
        let err = core(DomainError::InvalidName {
            name: "Bad Name".into(),
            reason: "name cannot contain whitespace".into(),
        });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn existing_target_exits_with_user_error() {
        let err = core(ApplicationError::ProjectExists {
            path: PathBuf::from("/tmp/demo"),
        });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_template_is_internal() {
        let err = core(ApplicationError::TemplateNotFound {
            language: "javascript".into(),
            path: PathBuf::from("/opt/templates/js"),
        });
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn exit_code_not_found() {
        assert_eq!(
            CliError::ConfigKeyNotFound {
                key: "nope".into()
            }
            .exit_code(),
            3
        );
    }

    #[test]
    fn exit_code_configuration() {
        assert_eq!(
            CliError::ConfigError {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            4
        );
    }

    #[test]
    fn exit_code_internal() {
        assert_eq!(
            CliError::IoError {
                message: "x".into(),
                source: io::Error::other("e"),
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn cancelled_is_a_user_error() {
        assert_eq!(CliError::Cancelled.exit_code(), 2);
    }

    // ── suggestions / format ──────────────────────────────────────────────

    #[test]
    fn core_suggestions_pass_through() {
        let inner = DexError::from(ApplicationError::ProjectExists {
            path: PathBuf::from("/tmp/demo"),
        });
        let expected = inner.suggestions();
        assert_eq!(CliError::Core(inner).suggestions(), expected);
    }

    #[test]
    fn format_plain_contains_error_header() {
        let err = core(ApplicationError::ProjectExists {
            path: PathBuf::from("/tmp/x"),
        });
        let s = err.format_plain(false);
        assert!(s.contains("Error: Project already exists at /tmp/x"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
    }

    #[test]
    fn format_plain_verbose_shows_cause_and_omits_hint() {
        let err = CliError::IoError {
            message: "writing dex.toml".into(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let s = err.format_plain(true);
        assert!(s.contains("Caused by: denied"));
        assert!(!s.contains("--verbose"));
    }

    // ── IntoCli ───────────────────────────────────────────────────────────

    #[test]
    fn colored_and_plain_carry_the_same_text() {
        let err = CliError::ConfigKeyNotFound { key: "nope".into() };
        let colored = err.format_colored(false);
        let plain = err.format_plain(false);
        assert!(colored.contains("nope"));
        assert!(plain.contains("Error: Unknown configuration key 'nope'"));
        assert!(!plain.contains('\u{1b}'));
    }

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli: CliResult<()> = result.with_cli_context(|| "reading config");
        match cli {
            Err(CliError::IoError { message, .. }) => assert_eq!(message, "reading config"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
