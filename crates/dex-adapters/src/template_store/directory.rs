//! Templates stored as plain directory trees: `<root>/js`, `<root>/ts`.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use dex_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{Language, TemplateRoot},
    error::DexResult,
};

use super::discovery::discover_templates_dir;

/// Resolves each language to `<root>/<template id>` on disk.
#[derive(Debug, Clone)]
pub struct DirectoryTemplateStore {
    root: PathBuf,
}

impl DirectoryTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at the discovered templates directory.
    pub fn discover(explicit: Option<&Path>) -> Self {
        Self::new(discover_templates_dir(explicit))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateStore for DirectoryTemplateStore {
    fn location(&self, language: Language) -> PathBuf {
        self.root.join(language.template_id())
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn resolve(&self, language: Language) -> DexResult<TemplateRoot> {
        let path = self.location(language);
        if !path.is_dir() {
            return Err(ApplicationError::TemplateNotFound {
                language: language.template_id().to_string(),
                path,
            }
            .into());
        }
        debug!(path = %path.display(), "template resolved");
        Ok(TemplateRoot::new(language, path))
    }
}
