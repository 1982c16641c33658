//! Answers for `dex new` that were not given as flags.
//!
//! [`Prompter`] is the seam: [`DefaultAnswers`] hands back the configured
//! defaults (`--yes`, or no terminal), [`TerminalPrompter`] asks through
//! dialoguer when the `interactive` feature is built in.

use dex_core::domain::{Language, PackageManager};

use crate::error::CliResult;

/// Shown when an interactive name fails validation.
pub const NAME_RULES: &str =
    "Project name may only include lower-case letters, numbers, hyphens, dots and underscores.";

/// Source of answers for questions the command line left open.
pub trait Prompter {
    fn project_name(&self, default: &str) -> CliResult<String>;
    fn language(&self, default: Language) -> CliResult<Language>;
    fn package_manager(&self, default: PackageManager) -> CliResult<PackageManager>;
    fn database(&self, default: bool) -> CliResult<bool>;
}

/// Answers every question with its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAnswers;

impl Prompter for DefaultAnswers {
    fn project_name(&self, default: &str) -> CliResult<String> {
        Ok(default.to_string())
    }

    fn language(&self, default: Language) -> CliResult<Language> {
        Ok(default)
    }

    fn package_manager(&self, default: PackageManager) -> CliResult<PackageManager> {
        Ok(default)
    }

    fn database(&self, default: bool) -> CliResult<bool> {
        Ok(default)
    }
}

/// Asks on the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

#[cfg(feature = "interactive")]
mod terminal {
    use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

    use dex_core::domain::{DomainValidator, Language, PackageManager};

    use super::{NAME_RULES, Prompter, TerminalPrompter};
    use crate::error::{CliError, CliResult};

    fn prompt_error(err: dialoguer::Error) -> CliError {
        match err {
            dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
                CliError::Cancelled
            }
            dialoguer::Error::IO(io) => CliError::IoError {
                message: "prompt failed".into(),
                source: io,
            },
        }
    }

    /// Index of `default` in `all`, falling back to the first entry.
    fn position<T: PartialEq>(all: &[T], default: &T) -> usize {
        all.iter().position(|item| item == default).unwrap_or(0)
    }

    impl Prompter for TerminalPrompter {
        fn project_name(&self, default: &str) -> CliResult<String> {
            Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt("What is the name of your project? :")
                .default(default.to_string())
                .validate_with(|input: &String| -> Result<(), String> {
                    DomainValidator::validate_project_name(input).map_err(|_| NAME_RULES.into())
                })
                .interact_text()
                .map_err(prompt_error)
        }

        fn language(&self, default: Language) -> CliResult<Language> {
            let labels: Vec<&str> = Language::ALL.iter().map(Language::display_name).collect();
            let picked = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Which language do you want to use?")
                .items(&labels)
                .default(position(&Language::ALL, &default))
                .interact()
                .map_err(prompt_error)?;
            Ok(Language::ALL.get(picked).copied().unwrap_or(default))
        }

        fn package_manager(&self, default: PackageManager) -> CliResult<PackageManager> {
            let labels: Vec<&str> = PackageManager::ALL.iter().map(PackageManager::as_str).collect();
            let picked = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Which package manager do you want to use?")
                .items(&labels)
                .default(position(&PackageManager::ALL, &default))
                .interact()
                .map_err(prompt_error)?;
            Ok(PackageManager::ALL.get(picked).copied().unwrap_or(default))
        }

        fn database(&self, default: bool) -> CliResult<bool> {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("Do you want to use MongoDB with Mongoose?")
                .default(default)
                .interact()
                .map_err(prompt_error)
        }
    }
}

#[cfg(not(feature = "interactive"))]
impl Prompter for TerminalPrompter {
    fn project_name(&self, _default: &str) -> CliResult<String> {
        Err(not_built())
    }

    fn language(&self, _default: Language) -> CliResult<Language> {
        Err(not_built())
    }

    fn package_manager(&self, _default: PackageManager) -> CliResult<PackageManager> {
        Err(not_built())
    }

    fn database(&self, _default: bool) -> CliResult<bool> {
        Err(not_built())
    }
}

#[cfg(not(feature = "interactive"))]
fn not_built() -> crate::error::CliError {
    crate::error::CliError::FeatureNotAvailable {
        feature: "interactive",
    }
}
