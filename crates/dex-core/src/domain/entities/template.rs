//! Template identity and location.
//!
//! A template is a static directory tree on disk, one per [`Language`]. The
//! domain only knows *which* template a language maps to and *where* it was
//! found; reading it is the filesystem port's job.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::Language;

/// Stable identifier of a bundled template (`js`, `ts`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateId(&'static str);

impl TemplateId {
    pub const fn for_language(language: Language) -> Self {
        Self(language.template_id())
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A resolved, existing template directory.
///
/// Read-only for the lifetime of a run: the scaffold only ever copies *from*
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRoot {
    id: TemplateId,
    language: Language,
    path: PathBuf,
}

impl TemplateRoot {
    pub fn new(language: Language, path: impl Into<PathBuf>) -> Self {
        Self {
            id: TemplateId::for_language(language),
            language,
            path: path.into(),
        }
    }

    pub const fn id(&self) -> TemplateId {
        self.id
    }

    pub const fn language(&self) -> Language {
        self.language
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for TemplateRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.path.display())
    }
}
