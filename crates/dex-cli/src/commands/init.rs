//! `dex init`: write a default configuration file.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::{
    cli::{GlobalArgs, InitArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Create a default Dex configuration file.
///
/// The target is `--config` when given, `./dex.toml` with `--local`, and
/// the user config file otherwise.
#[instrument(skip_all, fields(local = args.local, force = args.force))]
pub fn execute(args: InitArgs, global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    let path = target_path(&args, global.config.as_deref());
    let written = write_default_config(&path, args.force)?;
    info!(path = %written.display(), "configuration written");

    output.success(&format!("Configuration created at {}", written.display()))?;
    Ok(())
}

fn target_path(args: &InitArgs, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None if args.local => AppConfig::local_config_path(),
        None => AppConfig::config_path(),
    }
}

/// Write `AppConfig::default()` as TOML to `path`.
pub fn write_default_config(path: &Path, force: bool) -> CliResult<PathBuf> {
    if path.exists() && !force {
        return Err(CliError::ConfigExists {
            path: path.to_path_buf(),
        });
    }

    let toml = AppConfig::default()
        .to_toml()
        .with_cli_context(|| "Failed to serialise default config")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }

    std::fs::write(path, toml)
        .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))?;

    Ok(path.to_path_buf())
}
