//! Tracing subscriber setup for the `dex` binary.
//!
//! `dex-core` and `dex-adapters` only emit spans and events; the subscriber
//! lives here. `RUST_LOG` replaces the flag-derived filter entirely.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;

/// Crates whose events pass the flag-derived filter.
const WORKSPACE_TARGETS: [&str; 3] = ["dex", "dex_core", "dex_adapters"];

/// Install the global subscriber. Call once, before the first event.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(default_directives(args)),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(args.ansi_stderr())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))
}

/// `dex=<level>,dex_core=<level>,dex_adapters=<level>`
fn default_directives(args: &GlobalArgs) -> String {
    let level = args.log_level();
    WORKSPACE_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn args_with(verbose: u8, quiet: bool) -> GlobalArgs {
        GlobalArgs {
            verbose,
            quiet,
            no_color: true,
            config: None,
            output_format: OutputFormat::Auto,
        }
    }

    #[test]
    fn default_filter_covers_every_workspace_crate() {
        assert_eq!(
            default_directives(&args_with(0, false)),
            "dex=warn,dex_core=warn,dex_adapters=warn"
        );
    }

    #[test]
    fn verbose_flag_raises_every_target() {
        let directives = default_directives(&args_with(2, false));
        assert_eq!(directives.matches("=debug").count(), 3);
    }

    #[test]
    fn quiet_filter_keeps_errors() {
        assert!(default_directives(&args_with(1, true)).starts_with("dex=error,"));
    }

    #[test]
    fn directives_parse() {
        assert!(EnvFilter::try_new(default_directives(&args_with(3, false))).is_ok());
    }
}
