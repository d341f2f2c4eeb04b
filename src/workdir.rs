//! Resolution of the single directory every step runs in

use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkdirError {
    #[error("Unable to find project directory: {path:?}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Project directory is not a directory: {0:?}")]
    NotADirectory(PathBuf),
    #[error("Unknown working directory: {0}")]
    UnknownWorkingDirectory(String),
}

/// Join `path` onto `base` unless it is already absolute.
#[must_use]
pub fn relative_to(base: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        base.join(path)
    } else {
        path.to_path_buf()
    }
}

/// Pick the project directory: an explicit one from the command line, else one
/// from the config file (already made absolute), else `cwd`.
///
/// # Errors
///
/// Returns `WorkdirError::NotFound` if the chosen directory does not exist, or
/// `WorkdirError::NotADirectory` if it is a file.
pub fn resolve(
    cli_dir: Option<&Path>,
    config_dir: Option<&Path>,
    cwd: &Path,
) -> Result<PathBuf, WorkdirError> {
    let Some(dir) = cli_dir
        .map(|dir| relative_to(cwd, dir))
        .or_else(|| config_dir.map(Path::to_path_buf))
    else {
        debug!("No project directory given, using {}", cwd.display());
        return Ok(cwd.to_path_buf());
    };

    let resolved = dir.canonicalize().map_err(|source| WorkdirError::NotFound {
        path: dir.clone(),
        source,
    })?;
    if !resolved.is_dir() {
        return Err(WorkdirError::NotADirectory(resolved));
    }
    debug!("Project directory resolved to {}", resolved.display());
    Ok(resolved)
}

/// The directory this process was started in.
///
/// # Errors
///
/// Returns `WorkdirError::UnknownWorkingDirectory` if it cannot be determined.
pub fn current() -> Result<PathBuf, WorkdirError> {
    std::env::current_dir().map_err(|e| WorkdirError::UnknownWorkingDirectory(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_cwd() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve(None, None, dir.path()).unwrap(), dir.path());
    }

    #[test]
    fn test_cli_dir_relative_to_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("project")).unwrap();
        let resolved = resolve(Some(Path::new("project")), None, dir.path()).unwrap();
        assert_eq!(
            resolved,
            dir.path().join("project").canonicalize().unwrap()
        );
    }

    #[test]
    fn test_cli_dir_wins_over_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("cli")).unwrap();
        std::fs::create_dir(dir.path().join("config")).unwrap();
        let config_dir = dir.path().join("config");
        let resolved = resolve(Some(Path::new("cli")), Some(&config_dir), dir.path()).unwrap();
        assert!(resolved.ends_with("cli"));
    }

    #[test]
    fn test_config_dir_used_without_cli_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join("config");
        std::fs::create_dir(&config_dir).unwrap();
        let resolved = resolve(None, Some(&config_dir), dir.path()).unwrap();
        assert!(resolved.ends_with("config"));
    }

    #[test]
    fn test_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        match resolve(Some(Path::new("nope")), None, dir.path()) {
            Err(WorkdirError::NotFound { path, .. }) => assert_eq!(path, dir.path().join("nope")),
            other => panic!("Expected NotFound, got: {other:?}"),
        }
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("file"), "").unwrap();
        let result = resolve(Some(Path::new("file")), None, dir.path());
        assert!(matches!(result, Err(WorkdirError::NotADirectory(_))));
    }
}
