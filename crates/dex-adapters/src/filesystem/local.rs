//! Local filesystem adapter using std::fs.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use walkdir::WalkDir;

use dex_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, WalkEntry},
    },
    domain::RelativePath,
    error::{DexError, DexResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path).is_ok()
    }

    fn create_dir(&self, path: &Path) -> DexResult<()> {
        std::fs::create_dir(path).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => ApplicationError::ProjectExists {
                path: path.to_path_buf(),
            }
            .into(),
            _ => map_io_error(path, e, "create directory"),
        })
    }

    fn create_dir_all(&self, path: &Path) -> DexResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn walk(&self, root: &Path) -> DexResult<Vec<WalkEntry>> {
        let mut entries = Vec::new();

        // WalkDir yields a directory before its contents; sort for stable
        // output. Links are followed so their targets get copied; a dangling
        // link or a loop surfaces as a walk error.
        for walk_entry in WalkDir::new(root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let walk_entry = walk_entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                DexError::from(ApplicationError::FilesystemError {
                    reason: format!("Failed to walk directory: {e}"),
                    path,
                })
            })?;

            let rel = walk_entry.path().strip_prefix(root).map_err(|_| {
                DexError::from(ApplicationError::FilesystemError {
                    path: walk_entry.path().to_path_buf(),
                    reason: format!("not below {}", root.display()),
                })
            })?;
            let rel = RelativePath::try_new(rel)?;

            let file_type = walk_entry.file_type();
            if file_type.is_dir() {
                entries.push(WalkEntry::directory(rel));
            } else if file_type.is_file() {
                entries.push(WalkEntry::file(rel));
            } else {
                return Err(ApplicationError::CopyFailed {
                    path: walk_entry.path().to_path_buf(),
                    reason: "not a regular file or directory".into(),
                }
                .into());
            }
        }

        Ok(entries)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> DexResult<()> {
        std::fs::copy(from, to).map(drop).map_err(|e| {
            ApplicationError::CopyFailed {
                path: to.to_path_buf(),
                reason: format!("{} -> {}: {e}", from.display(), to.display()),
            }
            .into()
        })
    }

    fn read_to_string(&self, path: &Path) -> DexResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &str) -> DexResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn write_file_atomic(&self, path: &Path, content: &str) -> DexResult<()> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        // The temp file must share the target's filesystem for the rename.
        let mut tmp =
            NamedTempFile::new_in(dir).map_err(|e| map_io_error(path, e, "create temp file"))?;
        tmp.write_all(content.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| map_io_error(path, e, "write temp file"))?;
        tmp.persist(path)
            .map(drop)
            .map_err(|e| map_io_error(path, e.error, "replace file"))
    }

    fn rename(&self, from: &Path, to: &Path) -> DexResult<()> {
        std::fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename"))
    }

    fn remove_file(&self, path: &Path) -> DexResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir_all(&self, path: &Path) -> DexResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> DexError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dex_core::application::ports::EntryKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn walk_lists_parents_before_children() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("src/models")).unwrap();
        fs::write(temp.path().join("src/models/.gitkeep"), "").unwrap();
        fs::write(temp.path().join("package.json"), "{}").unwrap();

        let entries = LocalFilesystem.walk(temp.path()).unwrap();
        let pos = |p: &str| {
            entries
                .iter()
                .position(|e| e.path.as_path() == Path::new(p))
                .unwrap()
        };

        assert_eq!(entries.len(), 4);
        assert!(pos("src") < pos("src/models"));
        assert!(pos("src/models") < pos("src/models/.gitkeep"));
        assert_eq!(entries[pos("package.json")].kind, EntryKind::File);
        assert_eq!(entries[pos("src")].kind, EntryKind::Directory);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_counts_as_existing() {
        let temp = TempDir::new().unwrap();
        let link = temp.path().join("demo");
        std::os::unix::fs::symlink("/nonexistent/elsewhere", &link).unwrap();

        assert!(LocalFilesystem.exists(&link));
        let err = LocalFilesystem.create_dir(&link).unwrap_err();
        assert!(matches!(
            err,
            DexError::Application(ApplicationError::ProjectExists { .. })
        ));
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    }

    #[test]
    fn create_dir_is_not_recursive() {
        let temp = TempDir::new().unwrap();
        LocalFilesystem.create_dir(&temp.path().join("demo")).unwrap();
        assert!(temp.path().join("demo").is_dir());
        assert!(
            LocalFilesystem
                .create_dir(&temp.path().join("a/b"))
                .is_err()
        );
    }

    #[cfg(unix)]
    #[test]
    fn walk_follows_file_links() {
        let temp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("shared.js"), "x").unwrap();
        std::os::unix::fs::symlink(outside.path().join("shared.js"), temp.path().join("linked.js"))
            .unwrap();

        let entries = LocalFilesystem.walk(temp.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[0].path.as_path(), Path::new("linked.js"));
    }

    #[cfg(unix)]
    #[test]
    fn walk_reports_dangling_links() {
        let temp = TempDir::new().unwrap();
        std::os::unix::fs::symlink("/nonexistent/elsewhere", temp.path().join("gone.js")).unwrap();

        assert!(LocalFilesystem.walk(temp.path()).is_err());
    }

    #[test]
    fn atomic_write_replaces_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("server.js");
        fs::write(&path, "old").unwrap();

        LocalFilesystem.write_file_atomic(&path, "new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        // Only the target remains; the temp file was renamed over it.
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn copy_failure_names_destination() {
        let temp = TempDir::new().unwrap();
        let err = LocalFilesystem
            .copy_file(&temp.path().join("missing"), &temp.path().join("out"))
            .unwrap_err();

        assert!(matches!(
            err,
            DexError::Application(ApplicationError::CopyFailed { ref path, .. })
                if path.ends_with("out")
        ));
    }

    #[test]
    fn io_errors_carry_the_path() {
        let err = LocalFilesystem
            .read_to_string(Path::new("/definitely/not/here.txt"))
            .unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }
}
