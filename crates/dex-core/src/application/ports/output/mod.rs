//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `dex-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{Language, RelativePath, TemplateRoot};
use crate::error::DexResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One node found while walking a tree, relative to the walked root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: RelativePath,
    pub kind: EntryKind,
}

impl WalkEntry {
    pub fn file(path: RelativePath) -> Self {
        Self {
            path,
            kind: EntryKind::File,
        }
    }

    pub fn directory(path: RelativePath) -> Self {
        Self {
            path,
            kind: EntryKind::Directory,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `dex_adapters::filesystem::LocalFilesystem` (production)
/// - `dex_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Whether anything occupies `path`. A symlink counts even when its
    /// target is missing.
    fn exists(&self, path: &Path) -> bool;

    /// Create exactly one new directory; its parent must exist.
    ///
    /// Fails with `ProjectExists` when any entry already occupies `path`.
    fn create_dir(&self, path: &Path) -> DexResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> DexResult<()>;

    /// Every entry below `root` (the root itself excluded), parents before
    /// their children.
    fn walk(&self, root: &Path) -> DexResult<Vec<WalkEntry>>;

    /// Copy one file byte for byte. The destination's parent must exist.
    fn copy_file(&self, from: &Path, to: &Path) -> DexResult<()>;

    fn read_to_string(&self, path: &Path) -> DexResult<String>;

    /// Write content to a file, replacing any previous content.
    fn write_file(&self, path: &Path, content: &str) -> DexResult<()>;

    /// Replace a file's content so readers see either the old or the new
    /// text, never a partial write.
    fn write_file_atomic(&self, path: &Path, content: &str) -> DexResult<()>;

    fn rename(&self, from: &Path, to: &Path) -> DexResult<()>;

    fn remove_file(&self, path: &Path) -> DexResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> DexResult<()>;
}

/// Port for locating template trees.
///
/// Implemented by `dex_adapters::template_store::DirectoryTemplateStore`.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore: Send + Sync {
    /// Where the template for `language` is expected, whether or not it
    /// exists.
    fn location(&self, language: Language) -> PathBuf;

    /// The template for `language`, failing with `TemplateNotFound` when
    /// its directory is absent.
    fn resolve(&self, language: Language) -> DexResult<TemplateRoot>;
}
