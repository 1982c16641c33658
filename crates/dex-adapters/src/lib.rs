//! Infrastructure adapters for Dex.
//!
//! Implements the ports defined in `dex_core::application::ports`. All disk
//! access in the workspace happens here.

pub mod filesystem;
pub mod template_store;

pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use template_store::{DirectoryTemplateStore, TEMPLATES_DIR_ENV, discover_templates_dir};
