//! Runs the package manager inside a freshly generated project.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, instrument};

use dex_core::domain::PackageManager;

use crate::error::{CliError, CliResult};

/// How the child process's output is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutput {
    /// Child writes straight to the user's terminal.
    Inherit,
    /// Output is swallowed; stderr is kept for the error report.
    Captured,
}

/// One dependency installation in one directory.
#[derive(Debug, Clone)]
pub struct Installer {
    package_manager: PackageManager,
    project_dir: PathBuf,
}

impl Installer {
    pub fn new(package_manager: PackageManager, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            package_manager,
            project_dir: project_dir.into(),
        }
    }

    /// Shell form of the command, for messages.
    pub fn display_command(&self) -> String {
        let (program, args) = self.package_manager.install_command();
        std::iter::once(program)
            .chain(args)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The process to spawn, without any stdio wiring.
    pub fn command(&self) -> Command {
        let (program, args) = self.package_manager.install_command();
        let mut command = Command::new(program);
        command.args(args).current_dir(&self.project_dir);
        command
    }

    /// Run the install and wait for it.
    ///
    /// A missing executable and a non-zero exit are both
    /// [`CliError::ExternalCommandFailed`].
    #[instrument(skip_all, fields(command = %self.display_command(), dir = %self.project_dir.display()))]
    pub fn run(&self, mode: InstallOutput) -> CliResult<()> {
        let mut command = self.command();
        let failed = |source: Option<Box<dyn std::error::Error + Send + Sync>>| {
            CliError::ExternalCommandFailed {
                command: self.display_command(),
                source,
            }
        };

        let (status, stderr) = match mode {
            InstallOutput::Inherit => {
                let status = command.status().map_err(|e| failed(Some(Box::new(e))))?;
                (status, String::new())
            }
            InstallOutput::Captured => {
                let output = command
                    .stdin(Stdio::null())
                    .output()
                    .map_err(|e| failed(Some(Box::new(e))))?;
                (
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim().to_string(),
                )
            }
        };

        debug!(%status, "package manager exited");
        if status.success() {
            return Ok(());
        }

        let detail = if stderr.is_empty() {
            format!("exited with {status}")
        } else {
            format!("exited with {status}: {stderr}")
        };
        Err(failed(Some(detail.into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::path::Path;
    use tempfile::TempDir;

    fn args_of(command: &Command) -> Vec<&OsStr> {
        command.get_args().collect()
    }

    #[test]
    fn yarn_runs_bare() {
        let installer = Installer::new(PackageManager::Yarn, "/work/demo");
        let command = installer.command();
        assert_eq!(command.get_program(), "yarn");
        assert!(args_of(&command).is_empty());
        assert_eq!(installer.display_command(), "yarn");
    }

    #[test]
    fn others_run_install_in_project_dir() {
        for pm in [PackageManager::Npm, PackageManager::Pnpm, PackageManager::Bun] {
            let installer = Installer::new(pm, "/work/demo");
            let command = installer.command();
            assert_eq!(command.get_program(), pm.as_str());
            assert_eq!(args_of(&command), vec![OsStr::new("install")]);
            assert_eq!(command.get_current_dir(), Some(Path::new("/work/demo")));
            assert_eq!(installer.display_command(), format!("{} install", pm.as_str()));
        }
    }

    #[test]
    fn missing_directory_is_a_command_failure() {
        let temp = TempDir::new().unwrap();
        let installer = Installer::new(PackageManager::Npm, temp.path().join("absent"));
        let err = installer.run(InstallOutput::Captured).unwrap_err();
        assert!(matches!(err, CliError::ExternalCommandFailed { .. }));
        assert_eq!(err.exit_code(), 1);
    }
}
