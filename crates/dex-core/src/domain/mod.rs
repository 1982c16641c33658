//! Core domain layer for Dex.
//!
//! Pure logic only: name rules, the language and package-manager catalogue,
//! and the text transforms applied to a copied template (`package.json`
//! merge, `.env` rendering, database wiring). No filesystem access happens
//! here; the application layer reaches disk through ports.

pub mod entities;
pub mod env_file;
pub mod error;
pub mod injection;
pub mod manifest;
pub mod value_objects;

mod validation;

pub use entities::{
    RelativePath,
    project_spec::{HasName, NoName, ProjectName, ProjectSpec, ProjectSpecBuilder},
    template::{TemplateId, TemplateRoot},
};
pub use env_file::{ENV_FILE, EnvFile};
pub use error::{DomainError, ErrorCategory};
pub use injection::{InjectionPlan, database_module_source};
pub use manifest::{MANIFEST_FILE, ManifestDocument};
pub use validation::DomainValidator;
pub use value_objects::{Language, PackageManager};

/// Placeholder files that keep empty template directories in version control.
pub const PLACEHOLDER_FILE: &str = ".gitkeep";

/// Stored name of the ignore file inside a template; package registries strip
/// a literal `.gitignore`, so templates ship it under this name.
pub const TEMPLATE_IGNORE_FILE: &str = "_gitignore";

/// Name the ignore file is given in the generated project.
pub const IGNORE_FILE: &str = ".gitignore";
