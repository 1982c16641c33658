//! `dex config`: inspect the effective configuration.

use serde_json::Value;

use crate::{
    cli::{ConfigCommands, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.data(&value)?;
        }

        ConfigCommands::List => {
            if output.format() == OutputFormat::Json {
                let json =
                    serde_json::to_string_pretty(&config).map_err(std::io::Error::from)?;
                output.data(&json)?;
            } else {
                let toml = config
                    .to_toml()
                    .with_cli_context(|| "Failed to serialise config")?;
                output.data(toml.trim_end())?;
            }
        }

        ConfigCommands::Path => {
            output.data(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

/// Scalar values print bare; tables print as JSON.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    match config.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(Value::Null) | None => Err(CliError::ConfigKeyNotFound {
            key: key.to_string(),
        }),
        Some(other) => Ok(other.to_string()),
    }
}
