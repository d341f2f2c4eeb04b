//! Core implementation of gitpush
//!
//! gitpush stages every change in a project, commits it with a message read from
//! the user, and pushes it. Each step is a `git` invocation that must succeed
//! before the next one starts.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config_file::{Config, ConfigError};

pub mod config_file;
pub mod logger;
pub mod prompt;
pub mod runner;
pub mod sequence;
pub mod theme;
pub mod workdir;

/// Load configuration from a file (or auto-detect from `cwd` upwards).
///
/// Returns the default config and no path when nothing is found. A
/// `project_dir` in the returned config is made absolute against the config
/// file's directory.
///
/// # Errors
///
/// Returns `ConfigError` if an explicit config file does not exist, or if the
/// file cannot be parsed.
pub fn load_config(
    config_file: Option<&str>,
    cwd: &Path,
) -> Result<(Config, Option<PathBuf>), ConfigError> {
    let config_path = match config_file {
        Some(file) => {
            let config_path = workdir::relative_to(cwd, Path::new(file));
            if !config_path.exists() {
                return Err(ConfigError::ConfigNotFound(config_path));
            }
            config_path
        }
        None => match Config::find_config(cwd) {
            Some(path) => path,
            None => {
                debug!("No config file found, using defaults");
                return Ok((Config::default(), None));
            }
        },
    };

    let mut config = Config::from_file(&config_path)?;
    if let Some(version) = &config.gitpush_version {
        validate_version(version);
    }
    if let Some(base) = config_path.parent() {
        config.project_dir = config
            .project_dir
            .map(|dir| workdir::relative_to(base, &dir));
    }
    debug!(
        "Loaded config from {} (project_dir: {:?})",
        config_path.display(),
        config.project_dir
    );
    Ok((config, Some(config_path)))
}

/// Warn if the config's `gitpush_version` doesn't match the binary version
fn validate_version(config_version: &str) {
    let binary_version = env!("CARGO_PKG_VERSION");
    if config_version != binary_version {
        warn!(
            "Config gitpush_version '{config_version}' differs from binary version '{binary_version}'"
        );
    }
}
