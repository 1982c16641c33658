//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No template directory for the requested language.
    #[error("Template '{language}' not found at {path}")]
    TemplateNotFound { language: String, path: PathBuf },

    /// The target directory is already present.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// Copying the template tree failed part-way.
    #[error("Failed to copy template into {path}: {reason}")]
    CopyFailed { path: PathBuf, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The copied template has no `package.json`.
    #[error("No package manifest at {path}")]
    ManifestMissing { path: PathBuf },

    /// Shared in-memory state was poisoned.
    #[error("Filesystem state lock poisoned")]
    StoreLockError,

    /// Rollback failed (best-effort cleanup failed).
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { path, .. } => vec![
                format!("Expected a template directory at {}", path.display()),
                "Pass --templates-dir or set DEX_TEMPLATES_DIR".into(),
                "Try: dex list to see where templates are looked up".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Choose a different project name".into(),
                "Or use --dir to scaffold somewhere else".into(),
            ],
            Self::CopyFailed { path, .. } | Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure there is free disk space".into(),
            ],
            Self::ManifestMissing { .. } => vec![
                "The template is missing its package.json".into(),
                "Reinstall dex to restore the templates".into(),
            ],
            Self::RollbackFailed { path, .. } => vec![format!(
                "Remove {} by hand before retrying",
                path.display()
            )],
            Self::StoreLockError => vec!["Try again".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ProjectExists { .. } => ErrorCategory::Validation,
            // Missing templates are a packaging defect, not a user lookup.
            Self::TemplateNotFound { .. }
            | Self::ManifestMissing { .. }
            | Self::CopyFailed { .. }
            | Self::FilesystemError { .. }
            | Self::RollbackFailed { .. }
            | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
