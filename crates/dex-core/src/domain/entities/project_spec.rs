//! The `ProjectSpec` aggregate root and its typestate builder.
//!
//! A `ProjectSpec` is the complete, validated set of user choices for one
//! scaffold run. It is immutable once built and is the single input every
//! downstream component reads from.
//!
//! # Typestate builder
//!
//! The builder uses two phantom marker types (`NoName` / `HasName`) to
//! enforce at *compile time* that a validated [`ProjectName`] is supplied
//! before the spec can be built. Every other field has a default.

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;

use crate::domain::{
    error::DomainError,
    validation::DomainValidator,
    value_objects::{Language, PackageManager},
};

// ── ProjectName ──────────────────────────────────────────────────────────────

/// A project identifier that satisfies the naming grammar.
///
/// Invariant: matches `^[a-z0-9._-]+$`, is non-empty, and is neither `.` nor
/// `..`. Enforced at construction; there is no unchecked constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    /// Validate `name` and wrap it.
    pub fn parse(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        DomainValidator::validate_project_name(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ProjectName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── Aggregate root ────────────────────────────────────────────────────────────

/// Everything the user chose for one scaffold run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProjectSpec {
    name: ProjectName,
    language: Language,
    package_manager: PackageManager,
    use_database: bool,
}

impl ProjectSpec {
    /// Start building a new `ProjectSpec`.
    pub fn builder() -> ProjectSpecBuilder<NoName> {
        ProjectSpecBuilder::new()
    }

    pub fn name(&self) -> &ProjectName {
        &self.name
    }
    pub const fn language(&self) -> Language {
        self.language
    }
    pub const fn package_manager(&self) -> PackageManager {
        self.package_manager
    }
    pub const fn use_database(&self) -> bool {
        self.use_database
    }
}

impl fmt::Display for ProjectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {})",
            self.name,
            self.language.display_name(),
            self.package_manager
        )?;
        if self.use_database {
            write!(f, " + mongodb")?;
        }
        Ok(())
    }
}

// ── Typestate markers ─────────────────────────────────────────────────────────

/// Marker: name has not yet been set.
pub struct NoName;
/// Marker: name has been set; the spec may now be built.
pub struct HasName;

// ── Builder ───────────────────────────────────────────────────────────────────

/// Typestate builder for [`ProjectSpec`].
pub struct ProjectSpecBuilder<N> {
    name: Option<ProjectName>,
    language: Language,
    package_manager: PackageManager,
    use_database: bool,
    _marker: PhantomData<N>,
}

impl ProjectSpecBuilder<NoName> {
    pub fn new() -> Self {
        Self {
            name: None,
            language: Language::default(),
            package_manager: PackageManager::default(),
            use_database: false,
            _marker: PhantomData,
        }
    }

    /// Set the validated name. This transitions the builder to `HasName`.
    pub fn name(self, name: ProjectName) -> ProjectSpecBuilder<HasName> {
        ProjectSpecBuilder {
            name: Some(name),
            language: self.language,
            package_manager: self.package_manager,
            use_database: self.use_database,
            _marker: PhantomData,
        }
    }
}

impl Default for ProjectSpecBuilder<NoName> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> ProjectSpecBuilder<N> {
    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn package_manager(mut self, package_manager: PackageManager) -> Self {
        self.package_manager = package_manager;
        self
    }

    pub fn database(mut self, use_database: bool) -> Self {
        self.use_database = use_database;
        self
    }
}

impl ProjectSpecBuilder<HasName> {
    /// Finish the spec.
    ///
    /// Infallible: the only invariant (the naming grammar) was checked when
    /// the [`ProjectName`] was parsed.
    pub fn build(self) -> ProjectSpec {
        ProjectSpec {
            name: self
                .name
                .unwrap_or_else(|| unreachable!("typestate guarantees name is set")),
            language: self.language,
            package_manager: self.package_manager,
            use_database: self.use_database,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_plain_javascript_on_npm() {
        let spec = ProjectSpec::builder()
            .name(ProjectName::parse("demo").unwrap())
            .build();
        assert_eq!(spec.name().as_str(), "demo");
        assert_eq!(spec.language(), Language::JavaScript);
        assert_eq!(spec.package_manager(), PackageManager::Npm);
        assert!(!spec.use_database());
    }

    #[test]
    fn setters_before_and_after_name_both_apply() {
        let spec = ProjectSpec::builder()
            .language(Language::TypeScript)
            .name(ProjectName::parse("demo2").unwrap())
            .package_manager(PackageManager::Pnpm)
            .database(true)
            .build();
        assert_eq!(spec.language(), Language::TypeScript);
        assert_eq!(spec.package_manager(), PackageManager::Pnpm);
        assert!(spec.use_database());
        assert_eq!(spec.to_string(), "demo2 (TypeScript, pnpm) + mongodb");
    }

    #[test]
    fn project_name_rejects_dot_segments() {
        assert!(ProjectName::parse(".").is_err());
        assert!(ProjectName::parse("..").is_err());
        assert!("my.app".parse::<ProjectName>().is_ok());
    }
}
