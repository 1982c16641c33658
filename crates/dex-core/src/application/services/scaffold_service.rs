//! Scaffold Service - main application orchestrator.
//!
//! Runs one scaffold from a validated [`ProjectSpec`]:
//! 1. Resolve the template for the spec's language
//! 2. Materialize it into `<base_dir>/<name>`
//! 3. Wire in the database module when requested
//! 4. Rewrite `package.json` and write `.env`
//!
//! Any failure after this run has created the project directory removes it
//! before the error is returned. An entry that was already there, even a
//! dangling symlink, is reported as `ProjectExists` and never touched.

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateStore},
    },
    domain::{
        ENV_FILE, EnvFile, IGNORE_FILE, InjectionPlan, Language, MANIFEST_FILE,
        ManifestDocument, PLACEHOLDER_FILE, ProjectName, ProjectSpec, TEMPLATE_IGNORE_FILE,
        TemplateRoot, database_module_source,
    },
    error::DexResult,
};

/// One scaffold invocation: what to build and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldRequest {
    pub spec: ProjectSpec,
    pub base_dir: PathBuf,
}

impl ScaffoldRequest {
    pub fn new(spec: ProjectSpec, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            spec,
            base_dir: base_dir.into(),
        }
    }

    pub fn project_dir(&self) -> PathBuf {
        self.base_dir.join(self.spec.name().as_str())
    }
}

/// Outcome of copying a template tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    pub files_copied: usize,
    pub directories_created: usize,
    pub removed_placeholders: usize,
    pub renamed_ignore_file: bool,
}

/// Outcome of a full scaffold run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub project_dir: PathBuf,
    /// Files present in the generated project that this run wrote.
    pub files_written: usize,
    pub removed_placeholders: usize,
    pub renamed_ignore_file: bool,
    pub database_injected: bool,
}

/// What a scaffold would do, computed without touching the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldPlan {
    pub template: TemplateRoot,
    pub project_dir: PathBuf,
    /// Files generated from scratch, relative to the project.
    pub files_to_create: Vec<String>,
    /// Copied files rewritten after the copy, relative to the project.
    pub files_to_patch: Vec<String>,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    store: Box<dyn TemplateStore>,
    filesystem: Box<dyn Filesystem>,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use dex_core::application::{ScaffoldService, ports::*};
    /// # fn build(store: Box<dyn TemplateStore>, fs: Box<dyn Filesystem>) {
    /// let service = ScaffoldService::new(store, fs);
    /// # }
    /// ```
    pub fn new(store: Box<dyn TemplateStore>, filesystem: Box<dyn Filesystem>) -> Self {
        Self { store, filesystem }
    }

    /// Resolve the template and list the work without writing anything.
    pub fn plan(&self, request: &ScaffoldRequest) -> DexResult<ScaffoldPlan> {
        let spec = &request.spec;
        let template = self.store.resolve(spec.language())?;
        let project_dir = request.project_dir();
        self.ensure_absent(&project_dir)?;

        let mut files_to_create = vec![ENV_FILE.to_string()];
        let mut files_to_patch = vec![MANIFEST_FILE.to_string()];
        if spec.use_database() {
            files_to_create.push(spec.language().database_module_file());
            files_to_patch.push(spec.language().entry_file());
        }

        Ok(ScaffoldPlan {
            template,
            project_dir,
            files_to_create,
            files_to_patch,
        })
    }

    /// Scaffold a new project.
    #[instrument(
        skip_all,
        fields(
            project = %request.spec.name(),
            language = %request.spec.language(),
            database = request.spec.use_database(),
        )
    )]
    pub fn scaffold(&self, request: &ScaffoldRequest) -> DexResult<ScaffoldReport> {
        let spec = &request.spec;
        let template = self.store.resolve(spec.language())?;
        info!(template = %template, "Template resolved");

        let project_dir = request.project_dir();
        self.ensure_absent(&project_dir)?;
        // Nothing to roll back until the root is ours.
        self.create_root(&project_dir)?;

        match self.generate(&template, spec, &project_dir) {
            Ok(report) => {
                info!(files = report.files_written, "Scaffold completed successfully");
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, "Scaffold failed, attempting rollback");
                self.rollback(&project_dir);
                Err(e)
            }
        }
    }

    fn generate(
        &self,
        template: &TemplateRoot,
        spec: &ProjectSpec,
        project_dir: &Path,
    ) -> DexResult<ScaffoldReport> {
        let copied = self.populate(template, project_dir)?;
        let mut files_written = copied.files_copied - copied.removed_placeholders;

        if spec.use_database() {
            self.inject_database_feature(project_dir, spec.language())?;
            files_written += 1;
        }

        self.merge_manifest(project_dir, spec.name(), spec.use_database())?;
        if !self.filesystem.exists(&project_dir.join(ENV_FILE)) {
            files_written += 1;
        }
        self.write_env_file(project_dir, spec.name(), spec.use_database())?;

        Ok(ScaffoldReport {
            project_dir: project_dir.to_path_buf(),
            files_written,
            removed_placeholders: copied.removed_placeholders,
            renamed_ignore_file: copied.renamed_ignore_file,
            database_injected: spec.use_database(),
        })
    }

    /// Copy a template tree into `target`, strip placeholders and restore
    /// the ignore file's name.
    ///
    /// `target` must not exist; nothing is written when it does.
    #[instrument(skip_all, fields(template = %template.id(), target = %target.display()))]
    pub fn materialize(
        &self,
        template: &TemplateRoot,
        target: &Path,
    ) -> DexResult<MaterializeReport> {
        self.ensure_absent(target)?;
        self.create_root(target)?;
        self.populate(template, target)
    }

    /// Copy into a freshly created, empty `target`.
    fn populate(&self, template: &TemplateRoot, target: &Path) -> DexResult<MaterializeReport> {
        let mut report = MaterializeReport::default();

        for entry in self.filesystem.walk(template.path())? {
            let to = target.join(entry.path.as_path());
            if entry.is_file() {
                self.filesystem
                    .copy_file(&template.path().join(entry.path.as_path()), &to)?;
                report.files_copied += 1;
            } else {
                self.filesystem.create_dir_all(&to)?;
                report.directories_created += 1;
            }
        }
        debug!(
            files = report.files_copied,
            directories = report.directories_created,
            "Template copied"
        );

        // Walk the copy, not the template: placeholders nested anywhere in
        // the output must go.
        for entry in self.filesystem.walk(target)? {
            if entry.is_file() && entry.path.file_name() == Some(PLACEHOLDER_FILE) {
                self.filesystem.remove_file(&target.join(entry.path.as_path()))?;
                report.removed_placeholders += 1;
            }
        }

        let stored_ignore = target.join(TEMPLATE_IGNORE_FILE);
        if self.filesystem.exists(&stored_ignore) {
            self.filesystem
                .rename(&stored_ignore, &target.join(IGNORE_FILE))?;
            report.renamed_ignore_file = true;
        }

        Ok(report)
    }

    /// Generate the database connection module and wire it into the entry
    /// file.
    ///
    /// Both edits to the entry file are computed before anything is written;
    /// a missing anchor leaves the project untouched.
    #[instrument(skip_all, fields(target = %project_dir.display(), language = %language))]
    pub fn inject_database_feature(&self, project_dir: &Path, language: Language) -> DexResult<()> {
        let module_rel = language.database_module_file();
        let module_path = project_dir.join(&module_rel);
        if self.filesystem.exists(&module_path) {
            return Err(ApplicationError::FilesystemError {
                path: module_path,
                reason: "database module already exists".into(),
            }
            .into());
        }

        let entry_rel = language.entry_file();
        let entry_path = project_dir.join(&entry_rel);
        let source = self.filesystem.read_to_string(&entry_path)?;
        let patched = InjectionPlan::database().apply(&entry_rel, &source)?;

        if let Some(parent) = module_path.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem
            .write_file(&module_path, database_module_source(language))?;
        self.filesystem.write_file_atomic(&entry_path, &patched)?;

        info!(module = %module_rel, entry = %entry_rel, "Database module wired");
        Ok(())
    }

    /// Set the manifest's name and, when `use_database` is set, add the
    /// database driver dependency.
    #[instrument(skip_all, fields(target = %project_dir.display()))]
    pub fn merge_manifest(
        &self,
        project_dir: &Path,
        name: &ProjectName,
        use_database: bool,
    ) -> DexResult<()> {
        let path = project_dir.join(MANIFEST_FILE);
        if !self.filesystem.exists(&path) {
            return Err(ApplicationError::ManifestMissing { path }.into());
        }

        let raw = self.filesystem.read_to_string(&path)?;
        let mut manifest = ManifestDocument::parse(&raw)?;
        manifest.apply_scaffold(name, use_database)?;
        self.filesystem
            .write_file_atomic(&path, &manifest.to_pretty_string()?)?;

        debug!(name = %name, use_database, "Manifest updated");
        Ok(())
    }

    /// Write `.env`, replacing any existing file.
    pub fn write_env_file(
        &self,
        project_dir: &Path,
        name: &ProjectName,
        use_database: bool,
    ) -> DexResult<()> {
        let env = EnvFile::for_project(name, use_database);
        self.filesystem
            .write_file(&project_dir.join(ENV_FILE), &env.render())?;
        debug!(keys = env.len(), "Environment file written");
        Ok(())
    }

    fn ensure_absent(&self, project_dir: &Path) -> DexResult<()> {
        if self.filesystem.exists(project_dir) {
            return Err(ApplicationError::ProjectExists {
                path: project_dir.to_path_buf(),
            }
            .into());
        }
        Ok(())
    }

    /// Create the base directory if needed, then the project directory
    /// itself with a non-recursive create, so an entry that appeared after
    /// [`Self::ensure_absent`] still fails as `ProjectExists`.
    fn create_root(&self, project_dir: &Path) -> DexResult<()> {
        if let Some(base) = project_dir.parent() {
            if !base.as_os_str().is_empty() && !self.filesystem.exists(base) {
                self.filesystem.create_dir_all(base)?;
            }
        }
        self.filesystem.create_dir(project_dir)
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(
                error = %e,
                path = %root.display(),
                "Rollback failed"
            );
        } else {
            info!("Rollback successful");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::ports::{MockFilesystem, MockTemplateStore, WalkEntry},
        domain::{RelativePath, injection::IMPORT_ANCHOR},
        error::DexError,
    };
    use mockall::predicate::eq;

    fn spec(name: &str, language: Language, db: bool) -> ProjectSpec {
        ProjectSpec::builder()
            .name(ProjectName::parse(name).unwrap())
            .language(language)
            .database(db)
            .build()
    }

    fn store_with_js() -> MockTemplateStore {
        let mut store = MockTemplateStore::new();
        store
            .expect_resolve()
            .returning(|language| Ok(TemplateRoot::new(language, "/tpl/js")));
        store
    }

    fn rel(p: &str) -> RelativePath {
        RelativePath::try_new(p).unwrap()
    }

    #[test]
    fn existing_target_fails_before_any_write() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .with(eq(Path::new("/work/demo")))
            .return_const(true);
        fs.expect_create_dir().never();
        fs.expect_create_dir_all().never();
        fs.expect_copy_file().never();
        fs.expect_remove_dir_all().never();

        let service = ScaffoldService::new(Box::new(store_with_js()), Box::new(fs));
        let request = ScaffoldRequest::new(spec("demo", Language::JavaScript, false), "/work");

        let err = service.scaffold(&request).unwrap_err();
        assert!(matches!(
            err,
            DexError::Application(ApplicationError::ProjectExists { .. })
        ));
    }

    #[test]
    fn materialize_strips_placeholders_found_in_the_copy() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .with(eq(Path::new("/out/demo")))
            .return_const(false);
        fs.expect_exists()
            .with(eq(Path::new("/out/demo/_gitignore")))
            .return_const(true);
        fs.expect_exists()
            .with(eq(Path::new("/out")))
            .return_const(true);
        fs.expect_create_dir()
            .with(eq(Path::new("/out/demo")))
            .times(1)
            .returning(|_| Ok(()));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_walk()
            .with(eq(Path::new("/tpl/js")))
            .returning(|_| {
                Ok(vec![
                    WalkEntry::file(rel("_gitignore")),
                    WalkEntry::directory(rel("src")),
                    WalkEntry::directory(rel("src/models")),
                    WalkEntry::file(rel("src/models/.gitkeep")),
                    WalkEntry::file(rel("src/server.js")),
                ])
            });
        fs.expect_walk()
            .with(eq(Path::new("/out/demo")))
            .returning(|_| {
                Ok(vec![
                    WalkEntry::file(rel("_gitignore")),
                    WalkEntry::directory(rel("src")),
                    WalkEntry::directory(rel("src/models")),
                    WalkEntry::file(rel("src/models/.gitkeep")),
                    WalkEntry::file(rel("src/server.js")),
                ])
            });
        fs.expect_copy_file().times(3).returning(|_, _| Ok(()));
        fs.expect_remove_file()
            .with(eq(Path::new("/out/demo/src/models/.gitkeep")))
            .times(1)
            .returning(|_| Ok(()));
        fs.expect_rename()
            .with(
                eq(Path::new("/out/demo/_gitignore")),
                eq(Path::new("/out/demo/.gitignore")),
            )
            .times(1)
            .returning(|_, _| Ok(()));

        let service = ScaffoldService::new(Box::new(MockTemplateStore::new()), Box::new(fs));
        let report = service
            .materialize(
                &TemplateRoot::new(Language::JavaScript, "/tpl/js"),
                Path::new("/out/demo"),
            )
            .unwrap();

        assert_eq!(report.files_copied, 3);
        assert_eq!(report.directories_created, 2);
        assert_eq!(report.removed_placeholders, 1);
        assert!(report.renamed_ignore_file);
    }

    #[test]
    fn injection_without_anchor_writes_nothing() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_read_to_string()
            .returning(|_| Ok("import express from \"express\";\napp.listen(3000);".into()));
        fs.expect_create_dir_all().never();
        fs.expect_write_file().never();
        fs.expect_write_file_atomic().never();

        let service = ScaffoldService::new(Box::new(MockTemplateStore::new()), Box::new(fs));
        let err = service
            .inject_database_feature(Path::new("/out/demo"), Language::JavaScript)
            .unwrap_err();

        assert!(matches!(
            err,
            DexError::Domain(crate::domain::DomainError::AnchorNotFound { ref anchor, .. })
                if anchor == IMPORT_ANCHOR
        ));
    }

    #[test]
    fn existing_database_module_is_rejected() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .with(eq(Path::new("/out/demo/src/db/index.ts")))
            .return_const(true);
        fs.expect_read_to_string().never();

        let service = ScaffoldService::new(Box::new(MockTemplateStore::new()), Box::new(fs));
        assert!(
            service
                .inject_database_feature(Path::new("/out/demo"), Language::TypeScript)
                .is_err()
        );
    }

    #[test]
    fn missing_manifest_is_reported() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);

        let service = ScaffoldService::new(Box::new(MockTemplateStore::new()), Box::new(fs));
        let err = service
            .merge_manifest(
                Path::new("/out/demo"),
                &ProjectName::parse("demo").unwrap(),
                true,
            )
            .unwrap_err();

        assert!(matches!(
            err,
            DexError::Application(ApplicationError::ManifestMissing { .. })
        ));
    }

    #[test]
    fn manifest_is_rewritten_atomically() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        fs.expect_read_to_string()
            .returning(|_| Ok(r#"{"name":"tpl","dependencies":{"express":"^4.19.2"}}"#.into()));
        fs.expect_write_file().never();
        fs.expect_write_file_atomic()
            .withf(|path, content| {
                path == Path::new("/out/demo/package.json")
                    && content.contains("\"name\": \"demo\"")
                    && content.contains("\"mongoose\": \"^8.0.0\"")
                    && content.contains("\"express\": \"^4.19.2\"")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = ScaffoldService::new(Box::new(MockTemplateStore::new()), Box::new(fs));
        service
            .merge_manifest(
                Path::new("/out/demo"),
                &ProjectName::parse("demo").unwrap(),
                true,
            )
            .unwrap();
    }

    #[test]
    fn failure_after_creating_root_rolls_back() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .with(eq(Path::new("/work/demo")))
            .return_const(false);
        fs.expect_exists()
            .with(eq(Path::new("/work")))
            .return_const(true);
        fs.expect_create_dir()
            .with(eq(Path::new("/work/demo")))
            .times(1)
            .returning(|_| Ok(()));
        fs.expect_walk().returning(|path| {
            Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "unreadable".into(),
            }
            .into())
        });
        fs.expect_remove_dir_all()
            .with(eq(Path::new("/work/demo")))
            .times(1)
            .returning(|_| Ok(()));

        let service = ScaffoldService::new(Box::new(store_with_js()), Box::new(fs));
        let request = ScaffoldRequest::new(spec("demo", Language::JavaScript, false), "/work");

        assert!(service.scaffold(&request).is_err());
    }

    #[test]
    fn entry_appearing_after_check_is_reported_and_kept() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .with(eq(Path::new("/work/demo")))
            .return_const(false);
        fs.expect_exists()
            .with(eq(Path::new("/work")))
            .return_const(true);
        fs.expect_create_dir().returning(|path| {
            Err(ApplicationError::ProjectExists {
                path: path.to_path_buf(),
            }
            .into())
        });
        fs.expect_walk().never();
        fs.expect_remove_dir_all().never();

        let service = ScaffoldService::new(Box::new(store_with_js()), Box::new(fs));
        let request = ScaffoldRequest::new(spec("demo", Language::JavaScript, false), "/work");

        let err = service.scaffold(&request).unwrap_err();
        assert!(matches!(
            err,
            DexError::Application(ApplicationError::ProjectExists { .. })
        ));
    }

    #[test]
    fn missing_base_directory_is_created() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all()
            .with(eq(Path::new("/fresh/base")))
            .times(1)
            .returning(|_| Ok(()));
        fs.expect_create_dir()
            .with(eq(Path::new("/fresh/base/demo")))
            .times(1)
            .returning(|_| Ok(()));
        fs.expect_walk().returning(|_| Ok(Vec::new()));

        let service = ScaffoldService::new(Box::new(MockTemplateStore::new()), Box::new(fs));
        let report = service
            .materialize(
                &TemplateRoot::new(Language::JavaScript, "/tpl/js"),
                Path::new("/fresh/base/demo"),
            )
            .unwrap();
        assert_eq!(report, MaterializeReport::default());
    }

    #[test]
    fn plan_lists_database_work_only_when_requested() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        let service = ScaffoldService::new(Box::new(store_with_js()), Box::new(fs));

        let plain = service
            .plan(&ScaffoldRequest::new(
                spec("demo", Language::JavaScript, false),
                "/work",
            ))
            .unwrap();
        assert_eq!(plain.files_to_create, vec![".env"]);
        assert_eq!(plain.files_to_patch, vec!["package.json"]);
        assert_eq!(plain.project_dir, PathBuf::from("/work/demo"));

        let wired = service
            .plan(&ScaffoldRequest::new(
                spec("demo", Language::JavaScript, true),
                "/work",
            ))
            .unwrap();
        assert!(wired.files_to_create.contains(&"src/db/index.js".to_string()));
        assert!(wired.files_to_patch.contains(&"src/server.js".to_string()));
    }
}
