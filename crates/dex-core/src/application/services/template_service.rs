//! Template Service - template lookup and listing.
//!
//! Separated from ScaffoldService so `dex list` does not need a filesystem.

use std::path::PathBuf;

use crate::{
    application::ports::TemplateStore,
    domain::{Language, TemplateId, TemplateRoot},
    error::DexResult,
};

/// Information about a template for display purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInfo {
    pub language: Language,
    pub id: TemplateId,
    pub path: PathBuf,
    pub available: bool,
}

/// Service for template operations.
pub struct TemplateService {
    store: Box<dyn TemplateStore>,
}

impl TemplateService {
    pub fn new(store: Box<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// Resolve the template for one language.
    pub fn resolve(&self, language: Language) -> DexResult<TemplateRoot> {
        self.store.resolve(language)
    }

    /// Every supported language with its template location.
    pub fn list(&self) -> Vec<TemplateInfo> {
        Language::ALL
            .into_iter()
            .map(|language| match self.store.resolve(language) {
                Ok(root) => TemplateInfo {
                    language,
                    id: root.id(),
                    path: root.path().to_path_buf(),
                    available: true,
                },
                Err(_) => TemplateInfo {
                    language,
                    id: TemplateId::for_language(language),
                    path: self.store.location(language),
                    available: false,
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ApplicationError, ports::MockTemplateStore};

    #[test]
    fn list_marks_missing_templates_unavailable() {
        let mut store = MockTemplateStore::new();
        store.expect_resolve().returning(|language| match language {
            Language::JavaScript => Ok(TemplateRoot::new(language, "/tpl/js")),
            Language::TypeScript => Err(ApplicationError::TemplateNotFound {
                language: "ts".into(),
                path: "/tpl/ts".into(),
            }
            .into()),
        });
        store
            .expect_location()
            .returning(|language| PathBuf::from("/tpl").join(language.template_id()));

        let infos = TemplateService::new(Box::new(store)).list();

        assert_eq!(infos.len(), 2);
        assert!(infos[0].available);
        assert_eq!(infos[0].id.as_str(), "js");
        assert!(!infos[1].available);
        assert_eq!(infos[1].path, PathBuf::from("/tpl/ts"));
    }
}
