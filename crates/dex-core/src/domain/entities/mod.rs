pub mod common;
pub mod project_spec;
pub mod template;

pub use crate::domain::DomainError;
pub use common::RelativePath;
pub use project_spec::{ProjectName, ProjectSpec, ProjectSpecBuilder};
pub use template::{TemplateId, TemplateRoot};
