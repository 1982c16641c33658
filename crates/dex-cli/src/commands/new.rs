//! Implementation of the `dex new` command.
//!
//! Responsibility: gather the answers, build a `ProjectSpec`, call the core
//! scaffold service, install dependencies and display results. No business
//! logic lives here.

use std::io::IsTerminal as _;
use std::path::Path;

use tracing::{debug, info, instrument, warn};

use dex_adapters::{DirectoryTemplateStore, LocalFilesystem};
use dex_core::{
    application::{ScaffoldPlan, ScaffoldRequest, ScaffoldService},
    domain::{DomainValidator, Language, PackageManager, ProjectName, ProjectSpec},
};

use crate::{
    cli::NewArgs,
    config::{AppConfig, Defaults},
    error::{CliError, CliResult, IntoCli},
    installer::{InstallOutput, Installer},
    output::OutputManager,
    prompt::{DefaultAnswers, Prompter, TerminalPrompter},
};

/// Everything `dex new` needs to know, after flags, config and prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answers {
    pub name: ProjectName,
    pub language: Language,
    pub package_manager: PackageManager,
    pub database: bool,
}

impl Answers {
    pub fn into_spec(self) -> ProjectSpec {
        ProjectSpec::builder()
            .name(self.name)
            .language(self.language)
            .package_manager(self.package_manager)
            .database(self.database)
            .build()
    }
}

/// Execute the `dex new` command.
///
/// Dispatch sequence:
/// 1. Banner, then resolve answers (flags, prompts or configured defaults)
/// 2. Early-exit with the plan if `--dry-run`
/// 3. Scaffold via `ScaffoldService`
/// 4. Install dependencies unless skipped; failure only warns
/// 5. Print next-steps guidance
#[instrument(skip_all, fields(name = args.name.as_deref().unwrap_or("<prompt>")))]
pub fn execute(args: NewArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    output.banner()?;

    let interactive = !args.yes && std::io::stdin().is_terminal();
    let answers = if interactive {
        resolve_answers(&args, &config.defaults, &TerminalPrompter)?
    } else {
        debug!(yes = args.yes, "not prompting; using configured defaults");
        resolve_answers(&args, &config.defaults, &DefaultAnswers)?
    };
    let package_manager = answers.package_manager;
    let spec = answers.into_spec();
    debug!(spec = %spec, "project resolved");

    let base_dir = match &args.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().with_cli_context(|| "reading the current directory")?,
    };
    let templates_dir = args
        .templates_dir
        .clone()
        .or_else(|| config.templates.local_path.clone());

    let service = ScaffoldService::new(
        Box::new(DirectoryTemplateStore::discover(templates_dir.as_deref())),
        Box::new(LocalFilesystem::new()),
    );
    let request = ScaffoldRequest::new(spec, base_dir);

    if args.dry_run {
        let plan = service.plan(&request)?;
        return show_plan(&plan, &request.spec, &output);
    }

    let name = request.spec.name().clone();
    let project_dir = request.project_dir();

    output.print(&format!("Scaffolding project in {}...", project_dir.display()))?;
    if request.spec.use_database() {
        output.print("Setting up MongoDB...")?;
        output.print("Adding mongoose...")?;
    }

    info!(project = %name, path = %project_dir.display(), "scaffold started");
    let spinner = output.spinner(format!("Creating {name}"));
    let result = service.scaffold(&request);
    spinner.finish_and_clear();
    let report = result?;
    info!(files = report.files_written, "scaffold completed");

    let installed = if args.skip_install || config.install.skip {
        debug!("dependency installation skipped");
        false
    } else {
        install_dependencies(package_manager, &report.project_dir, &output)?
    };

    output.success(&format!(
        "Success! Created {name} at {}",
        report.project_dir.display()
    ))?;
    output.next_steps(&name, package_manager, installed)?;

    Ok(())
}

/// Fill every answer from flags first, then the prompter.
pub fn resolve_answers(
    args: &NewArgs,
    defaults: &Defaults,
    prompter: &dyn Prompter,
) -> CliResult<Answers> {
    let raw_name = match &args.name {
        Some(name) => name.clone(),
        None => prompter.project_name(&defaults.project_name)?,
    };
    let name = DomainValidator::parse_project_name(&raw_name)
        .map_err(|e| CliError::Core(e.into()))?;

    let language = match args.language {
        Some(lang) => lang.into(),
        None => prompter.language(defaults.language)?,
    };
    let package_manager = match args.package_manager {
        Some(pm) => pm.into(),
        None => prompter.package_manager(defaults.package_manager)?,
    };
    let database = match args.database() {
        Some(db) => db,
        None => prompter.database(defaults.database)?,
    };

    Ok(Answers {
        name,
        language,
        package_manager,
        database,
    })
}

/// Run the package manager; `Ok(false)` when it failed.
fn install_dependencies(
    package_manager: PackageManager,
    project_dir: &Path,
    output: &OutputManager,
) -> CliResult<bool> {
    let installer = Installer::new(package_manager, project_dir);
    output.print("Installing dependencies...")?;

    let mode = if output.is_quiet() {
        InstallOutput::Captured
    } else {
        InstallOutput::Inherit
    };
    match installer.run(mode) {
        Ok(()) => Ok(true),
        Err(err) => {
            warn!(error = %err, command = %installer.display_command(), "dependency install failed");
            output.warning("Error installing dependencies.")?;
            Ok(false)
        }
    }
}

fn show_plan(plan: &ScaffoldPlan, spec: &ProjectSpec, out: &OutputManager) -> CliResult<()> {
    out.info(&format!(
        "Dry run: would create '{}' at {}",
        spec.name(),
        plan.project_dir.display()
    ))?;
    out.print(&format!("  Language:        {}", spec.language().display_name()))?;
    out.print(&format!("  Package manager: {}", spec.package_manager()))?;
    out.print(&format!(
        "  MongoDB:         {}",
        if spec.use_database() { "yes" } else { "no" }
    ))?;
    out.print(&format!("  Template:        {}", plan.template.path().display()))?;
    for file in &plan.files_to_create {
        out.print(&format!("  create  {file}"))?;
    }
    for file in &plan.files_to_patch {
        out.print(&format!("  patch   {file}"))?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
