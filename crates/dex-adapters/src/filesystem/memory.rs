//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use dex_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, WalkEntry},
    },
    domain::RelativePath,
    error::DexResult,
};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can hand one clone to a service and inspect
/// the other afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating its parent directories (testing helper).
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) -> DexResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        self.write()?.files.insert(path.to_path_buf(), content.into());
        Ok(())
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.read().ok()?.files.get(path.as_ref()).cloned()
    }

    /// All file paths, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn read(&self) -> DexResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }

    fn write(&self) -> DexResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }
}

fn not_found(path: &Path) -> ApplicationError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: "No such file or directory".into(),
    }
}

impl MemoryFilesystemInner {
    fn require_parent(&self, path: &Path) -> DexResult<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.directories.contains(parent) => {
                Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into())
            }
            _ => Ok(()),
        }
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn create_dir(&self, path: &Path) -> DexResult<()> {
        let mut inner = self.write()?;
        if inner.files.contains_key(path) || inner.directories.contains(path) {
            return Err(ApplicationError::ProjectExists {
                path: path.to_path_buf(),
            }
            .into());
        }
        inner.require_parent(path)?;
        inner.directories.insert(path.to_path_buf());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> DexResult<()> {
        let mut inner = self.write()?;
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
        Ok(())
    }

    fn walk(&self, root: &Path) -> DexResult<Vec<WalkEntry>> {
        let inner = self.read()?;
        if !inner.directories.contains(root) {
            return Err(not_found(root).into());
        }

        let mut entries = Vec::new();
        for dir in inner.directories.iter() {
            match dir.strip_prefix(root) {
                Ok(rel) if !rel.as_os_str().is_empty() => {
                    entries.push(WalkEntry::directory(RelativePath::try_new(rel)?));
                }
                _ => {}
            }
        }
        for file in inner.files.keys() {
            if let Ok(rel) = file.strip_prefix(root) {
                entries.push(WalkEntry::file(RelativePath::try_new(rel)?));
            }
        }

        // Parents are strictly shallower than their children.
        entries.sort_by_key(|e| e.path.depth());
        Ok(entries)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> DexResult<()> {
        let mut inner = self.write()?;
        let content = inner.files.get(from).cloned().ok_or_else(|| {
            ApplicationError::CopyFailed {
                path: to.to_path_buf(),
                reason: format!("{} does not exist", from.display()),
            }
        })?;
        inner.require_parent(to)?;
        inner.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> DexResult<String> {
        self.read()?
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path).into())
    }

    fn write_file(&self, path: &Path, content: &str) -> DexResult<()> {
        let mut inner = self.write()?;
        inner.require_parent(path)?;
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn write_file_atomic(&self, path: &Path, content: &str) -> DexResult<()> {
        // A single map insert under the lock is already all-or-nothing.
        self.write_file(path, content)
    }

    fn rename(&self, from: &Path, to: &Path) -> DexResult<()> {
        let mut inner = self.write()?;
        let content = inner.files.remove(from).ok_or_else(|| not_found(from))?;
        inner.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> DexResult<()> {
        self.write()?
            .files
            .remove(path)
            .map(drop)
            .ok_or_else(|| not_found(path).into())
    }

    fn remove_dir_all(&self, path: &Path) -> DexResult<()> {
        let mut inner = self.write()?;
        if !inner.directories.contains(path) {
            return Err(not_found(path).into());
        }
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}
