//! Implementation of the `dex list` command.

use serde::Serialize;

use dex_adapters::DirectoryTemplateStore;
use dex_core::application::{TemplateInfo, TemplateService};

use crate::{
    cli::{ListArgs, ListFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// JSON shape of one template.
#[derive(Debug, Serialize)]
struct TemplateDto {
    id: &'static str,
    language: &'static str,
    path: String,
    available: bool,
}

impl From<&TemplateInfo> for TemplateDto {
    fn from(info: &TemplateInfo) -> Self {
        Self {
            id: info.id.as_str(),
            language: info.language.display_name(),
            path: info.path.display().to_string(),
            available: info.available,
        }
    }
}

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let explicit = args
        .templates_dir
        .or_else(|| config.templates.local_path.clone());
    let store = DirectoryTemplateStore::discover(explicit.as_deref());
    let root = store.root().to_path_buf();
    let templates = TemplateService::new(Box::new(store)).list();

    match args.format {
        ListFormat::Table => {
            output.header(&format!("Templates in {}:", root.display()))?;
            for t in &templates {
                let status = if t.available { "" } else { "  (missing)" };
                output.print(&format!(
                    "  {:<4} {:<12} {}{status}",
                    t.id.as_str(),
                    t.language.display_name(),
                    t.path.display()
                ))?;
            }
            if templates.iter().any(|t| !t.available) {
                output.warning("Some templates are missing; pass --templates-dir to point at them")?;
            }
        }

        ListFormat::List => {
            for t in templates.iter().filter(|t| t.available) {
                output.data(t.id.as_str())?;
            }
        }

        ListFormat::Json => {
            // Written even when quiet so pipes always get parseable output.
            let dtos: Vec<TemplateDto> = templates.iter().map(TemplateDto::from).collect();
            let json = serde_json::to_string_pretty(&dtos).map_err(std::io::Error::from)?;
            output.data(&json)?;
        }
    }

    Ok(())
}
