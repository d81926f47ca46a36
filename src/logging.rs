//! Logging setup module.
//!
//! The library reports through the [`log`] facade; this module installs [`env_logger`] behind it.
//! The interactive interface owns the terminal, so records only leave the process when a log file
//! is given or when the binary runs in print mode.

use std::{fs::File, path::Path};

use color_eyre::eyre::{Result, WrapErr as _};
use env_logger::{Builder, Target, DEFAULT_FILTER_ENV};
use log::LevelFilter;

/// Installs the global logger.
///
/// The default level is `info` and `RUST_LOG` overrides it. Records go to `log_file` when given,
/// to standard error when `to_stderr` is set, and nowhere otherwise, in which case `RUST_LOG` is
/// ignored.
///
/// # Errors
///
/// This function may return errors if:
/// - The log file cannot be created
/// - A global logger is already installed
pub fn init(log_file: Option<&Path>, to_stderr: bool) -> Result<()> {
    let filters = std::env::var(DEFAULT_FILTER_ENV).ok();
    let target = target(log_file, to_stderr)?;

    builder(filters.as_deref(), target)
        .try_init()
        .wrap_err("failed to install the logger")
}

/// Configures a logger writing to `target` with `filters` in the `RUST_LOG` syntax on top of the
/// `info` default.
///
/// Without a target every record is dropped, whatever the filters ask for.
fn builder(filters: Option<&str>, target: Option<Target>) -> Builder {
    let mut builder = Builder::new();
    match target {
        Some(target) => {
            let _ = builder.filter_level(LevelFilter::Info).target(target);
            if let Some(filters) = filters {
                let _ = builder.parse_filters(filters);
            }
        }
        None => {
            let _ = builder.filter_level(LevelFilter::Off);
        }
    }

    builder
}

/// Resolves where log records should be written, `None` meaning nowhere.
fn target(log_file: Option<&Path>, to_stderr: bool) -> Result<Option<Target>> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
            Ok(Some(Target::Pipe(Box::new(file))))
        }
        None if to_stderr => Ok(Some(Target::Stderr)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use log::{Level, Log as _, Metadata};

    use super::*;

    /// Metadata of a record emitted by the world module at `level`.
    fn world_record(level: Level) -> Metadata<'static> {
        Metadata::builder()
            .level(level)
            .target("tunnelcrawl::world")
            .build()
    }

    #[test]
    fn test_no_sink_ignores_module_filters() {
        let logger = builder(Some("tunnelcrawl=debug"), None).build();

        assert!(!logger.enabled(&world_record(Level::Info)));
        assert!(!logger.enabled(&world_record(Level::Debug)));
        assert!(!logger.enabled(&world_record(Level::Error)));
    }

    #[test]
    fn test_sink_defaults_to_info() {
        let logger = builder(None, Some(Target::Stderr)).build();

        assert!(logger.enabled(&world_record(Level::Info)));
        assert!(!logger.enabled(&world_record(Level::Debug)));
    }

    #[test]
    fn test_sink_honours_module_filters() {
        let logger = builder(Some("tunnelcrawl=debug"), Some(Target::Stderr)).build();

        assert!(logger.enabled(&world_record(Level::Debug)));
        assert!(!logger.enabled(&world_record(Level::Trace)));
    }

    #[test]
    fn test_no_sink_means_no_target() {
        let resolved = target(None, false).expect("resolving without a file cannot fail");

        assert!(resolved.is_none());
    }

    #[test]
    fn test_stderr_target_in_print_mode() {
        let resolved = target(None, true).expect("resolving without a file cannot fail");

        assert!(matches!(resolved, Some(Target::Stderr)));
    }

    #[test]
    fn test_log_file_is_created() {
        let path = std::env::temp_dir().join("tunnelcrawl-logging-test.log");

        let resolved = target(Some(&path), false).expect("temp dir should be writable");

        assert!(matches!(resolved, Some(Target::Pipe(_))));
        assert!(path.exists());
        std::fs::remove_file(&path).expect("log file should be removable");
    }

    #[test]
    fn test_unwritable_log_file_is_an_error() {
        let path = std::env::temp_dir()
            .join("tunnelcrawl-missing-directory")
            .join("nested")
            .join("run.log");

        assert!(target(Some(&path), false).is_err());
    }
}
