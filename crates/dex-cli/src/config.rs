//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (lowest priority first)
//!
//! 1. Built-in defaults
//! 2. The user config file (`config.toml` in the platform config dir), or the
//!    file given with `--config`, which must then exist
//! 3. `./dex.toml` in the working directory
//! 4. `DEX_*` environment variables, `__` separating nested keys
//!    (`DEX_DEFAULTS__PACKAGE_MANAGER=pnpm`)
//!
//! CLI flags beat all of the above and are applied by the commands.

use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use dex_core::domain::{Language, PackageManager};

/// File name of the per-directory configuration.
pub const LOCAL_CONFIG_FILE: &str = "dex.toml";

/// Prefix of configuration environment variables.
const ENV_PREFIX: &str = "DEX";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Answers used when a flag is missing and prompting is skipped.
    pub defaults: Defaults,
    pub install: InstallConfig,
    pub output: OutputConfig,
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub project_name: String,
    pub language: Language,
    pub package_manager: PackageManager,
    pub database: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            project_name: "my-dex-project".into(),
            language: Language::JavaScript,
            package_manager: PackageManager::Npm,
            database: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Never run the package manager after scaffolding.
    pub skip: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// Print the welcome banner before `dex new`.
    pub banner: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            banner: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Templates directory, used when `--templates-dir` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from every layer.
    ///
    /// `config_file` is the path passed via `--config`; when present it
    /// replaces the user config file and is required to exist.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let user_file = match config_file {
            Some(path) => ConfigFile::required(path),
            None => ConfigFile::optional(Self::config_path()),
        };
        Self::load_from(&[user_file, ConfigFile::optional(Self::local_config_path())])
    }

    /// Merge defaults, the given files in order, and the environment.
    pub fn load_from(files: &[ConfigFile]) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to encode built-in defaults")?;
        let mut builder = Config::builder().add_source(defaults);

        for file in files {
            debug!(path = %file.path.display(), required = file.required, "config source");
            builder = builder.add_source(
                File::from(file.path.as_path())
                    .format(FileFormat::Toml)
                    .required(file.required),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.dex.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "dex", "dex")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".dex.toml"))
    }

    pub fn local_config_path() -> PathBuf {
        PathBuf::from(LOCAL_CONFIG_FILE)
    }

    /// Look up a dotted key such as `defaults.language`.
    ///
    /// Returns `None` for unknown keys; tables come back as JSON objects.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let tree = serde_json::to_value(self).ok()?;
        let pointer = format!("/{}", key.trim().replace('.', "/"));
        tree.pointer(&pointer).cloned()
    }

    /// Render as TOML, the format `dex init` writes.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// One TOML file layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub required: bool,
}

impl ConfigFile {
    pub fn required(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: true,
        }
    }

    pub fn optional(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: false,
        }
    }
}
