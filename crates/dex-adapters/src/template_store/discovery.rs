//! Templates directory discovery.
//!
//! # Resolution order
//!
//! The first candidate that exists as a directory wins:
//!
//! 1. An explicit directory (`--templates-dir` or `templates.local_path`).
//! 2. **`$DEX_TEMPLATES_DIR`**: environment override, also picked up from a
//!    `.env` file in the working directory.
//! 3. **`./templates`**: relative to the current working directory.
//! 4. **`<executable-dir>/templates`**: sibling to the `dex` binary.
//! 5. **`<executable-dir>/../share/dex/templates`**: the usual layout for a
//!    prefix install (`/usr/local/bin/dex`).
//! 6. The workspace `templates/` directory recorded at compile time, so
//!    `cargo run` and `cargo install --path` work from a checkout.
//!
//! When nothing exists the first candidate is still returned, so the error
//! the store produces names a concrete path.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

/// Environment variable that overrides the templates directory.
pub const TEMPLATES_DIR_ENV: &str = "DEX_TEMPLATES_DIR";

/// Workspace `templates/` directory at build time.
const BUILD_TEMPLATES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates");

/// Pick the templates directory according to the documented order.
#[instrument(skip_all)]
pub fn discover_templates_dir(explicit: Option<&Path>) -> PathBuf {
    let candidates = candidate_paths(explicit);

    for candidate in &candidates {
        if candidate.is_dir() {
            debug!(path = %candidate.display(), "using templates directory");
            return candidate.clone();
        }
        debug!(path = %candidate.display(), "templates candidate missing, skipping");
    }

    warn!(
        "no templates directory found; checked --templates-dir, ${}, ./templates, \
         <exe>/templates, <exe>/../share/dex/templates and the build directory",
        TEMPLATES_DIR_ENV
    );
    candidates
        .into_iter()
        .next()
        .unwrap_or_else(|| PathBuf::from("templates"))
}

/// Build the ordered list of candidate paths to probe.
///
/// Missing env-var or unresolvable exe paths are omitted.
pub fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(6);

    if let Some(dir) = explicit {
        paths.push(dir.to_path_buf());
    }

    if let Some(env_dir) = std::env::var_os(TEMPLATES_DIR_ENV).filter(|v| !v.is_empty()) {
        let p = PathBuf::from(env_dir);
        debug!(path = %p.display(), "candidate from ${}", TEMPLATES_DIR_ENV);
        paths.push(p);
    }

    paths.push(PathBuf::from("templates"));

    if let Some(exe_dir) = exe_dir() {
        paths.push(exe_dir.join("templates"));
        paths.push(exe_dir.join("../share/dex/templates"));
    }

    paths.push(PathBuf::from(BUILD_TEMPLATES_DIR));

    paths
}

fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_directory_comes_first() {
        let temp = TempDir::new().unwrap();
        let paths = candidate_paths(Some(temp.path()));
        assert_eq!(paths[0], temp.path());
        assert_eq!(discover_templates_dir(Some(temp.path())), temp.path());
    }

    #[test]
    fn missing_explicit_directory_falls_through() {
        let found = discover_templates_dir(Some(Path::new("/no/such/templates")));
        assert_ne!(found, Path::new("/no/such/templates"));
    }

    #[test]
    fn build_directory_is_last_resort() {
        let paths = candidate_paths(None);
        assert_eq!(paths.last().map(PathBuf::as_path), Some(Path::new(BUILD_TEMPLATES_DIR)));
    }
}
