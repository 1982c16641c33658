// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (carried inside reports and CLI errors)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid project name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Unknown package manager: {0}")]
    UnknownPackageManager(String),

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    // ========================================================================
    // Template drift (the generated file no longer has the expected shape)
    // ========================================================================
    #[error("Anchor not found in {file}: expected {anchor}")]
    AnchorNotFound { file: String, anchor: String },

    #[error("Anchor matched {count} times in {file}, expected exactly one: {anchor}")]
    AmbiguousAnchor {
        file: String,
        anchor: String,
        count: usize,
    },

    #[error("{file} is already wired to the database module")]
    AlreadyInjected { file: String },

    #[error("Invalid package manifest: {reason}")]
    InvalidManifest { reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidName { name, .. } => vec![
                format!("'{}' does not follow the project naming rules", name),
                "Use only lower-case letters, digits, '-', '_' and '.'".into(),
                "Examples: my-api, shop_backend, api.v2".into(),
            ],
            Self::UnknownLanguage(_) => vec![
                "Supported languages: javascript (js), typescript (ts)".into(),
            ],
            Self::UnknownPackageManager(_) => {
                vec!["Supported package managers: npm, pnpm, yarn, bun".into()]
            }
            Self::AnchorNotFound { file, .. } | Self::AmbiguousAnchor { file, .. } => vec![
                format!("The bundled template's {} has an unexpected shape", file),
                "Reinstall dex so the templates match this version".into(),
                "Or scaffold without the database feature and wire it by hand".into(),
            ],
            Self::AlreadyInjected { file } => vec![format!(
                "{} already imports ./db/index.js; remove it from the template",
                file
            )],
            Self::InvalidManifest { .. } => vec![
                "The bundled template's package.json is corrupted".into(),
                "Reinstall dex to restore the templates".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidName { .. }
            | Self::UnknownLanguage(_)
            | Self::UnknownPackageManager(_) => ErrorCategory::Validation,
            _ => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
