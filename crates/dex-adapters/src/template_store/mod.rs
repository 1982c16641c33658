//! Template store adapters.

mod directory;
pub mod discovery;

pub use directory::DirectoryTemplateStore;
pub use discovery::{TEMPLATES_DIR_ENV, discover_templates_dir};
