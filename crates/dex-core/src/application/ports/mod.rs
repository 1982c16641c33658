//! Application ports (traits) for external dependencies.
//!
//! Driven ports are called by the application and implemented by
//! infrastructure in `dex-adapters`:
//!
//! - `Filesystem`: file and directory operations
//! - `TemplateStore`: template tree lookup

pub mod output;

pub use output::{EntryKind, Filesystem, TemplateStore, WalkEntry};

#[cfg(test)]
pub use output::{MockFilesystem, MockTemplateStore};
