//! Domain value objects: Language, PackageManager.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! This file's only job is to define the types, their string
//! representations, their `FromStr` parsers, and the fixed file layout each
//! language variant implies.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm and the `FromStr` arm here
//! 3. Add it to `ALL`
//! 4. Ship a `templates/<template_id>/` directory

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Language ─────────────────────────────────────────────────────────────────

/// Source language variant of the generated project.
///
/// Each variant owns exactly one template directory and one file extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(alias = "js")]
    JavaScript,
    #[serde(alias = "ts")]
    TypeScript,
}

impl Language {
    /// Every supported variant, in prompt order.
    pub const ALL: [Language; 2] = [Language::JavaScript, Language::TypeScript];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
        }
    }

    /// Human-facing label used in prompts and summaries.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
        }
    }

    /// Directory name of this variant's template under the templates root.
    pub const fn template_id(&self) -> &'static str {
        match self {
            Self::JavaScript => "js",
            Self::TypeScript => "ts",
        }
    }

    pub const fn file_extension(&self) -> &'static str {
        match self {
            Self::JavaScript => "js",
            Self::TypeScript => "ts",
        }
    }

    /// Relative path of the generated server entry file.
    pub fn entry_file(&self) -> String {
        format!("src/server.{}", self.file_extension())
    }

    /// Relative path of the generated database connection module.
    pub fn database_module_file(&self) -> String {
        format!("src/db/index.{}", self.file_extension())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "javascript" | "js" => Ok(Self::JavaScript),
            "typescript" | "ts" => Ok(Self::TypeScript),
            other => Err(DomainError::UnknownLanguage(other.to_string())),
        }
    }
}

// ── PackageManager ───────────────────────────────────────────────────────────

/// Package manager used to install the generated project's dependencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    /// Every supported package manager, in prompt order.
    pub const ALL: [PackageManager; 4] = [
        PackageManager::Npm,
        PackageManager::Pnpm,
        PackageManager::Yarn,
        PackageManager::Bun,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
            Self::Bun => "bun",
        }
    }

    /// Program and arguments that install dependencies in a project directory.
    ///
    /// `yarn` installs when run bare; the others need an explicit `install`.
    pub fn install_command(&self) -> (&'static str, Vec<&'static str>) {
        match self {
            Self::Yarn => ("yarn", Vec::new()),
            other => (other.as_str(), vec!["install"]),
        }
    }

    /// Shell line that runs a package script, e.g. `pnpm run dev`.
    pub fn run_script(&self, script: &str) -> String {
        format!("{} run {script}", self.as_str())
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "npm" => Ok(Self::Npm),
            "pnpm" => Ok(Self::Pnpm),
            "yarn" => Ok(Self::Yarn),
            "bun" => Ok(Self::Bun),
            other => Err(DomainError::UnknownPackageManager(other.to_string())),
        }
    }
}
