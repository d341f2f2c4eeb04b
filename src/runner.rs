//! Running external commands in a child process

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command as ProcessCommand, Stdio};
use std::time::Instant;

use log::debug;

/// A single external command: program, argument vector and working directory.
///
/// Arguments are handed to the process launcher as-is, no shell is involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Discard the child's stdout
    pub quiet: bool,
}

impl Invocation {
    #[must_use]
    pub fn new<I, S>(program: &str, args: I, cwd: &Path) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.to_path_buf(),
            quiet: false,
        }
    }

    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }
}

fn needs_quoting(arg: &str) -> bool {
    arg.is_empty()
        || arg.chars().any(|c| {
            c.is_whitespace()
                || matches!(
                    c,
                    '"' | '\'' | '\\' | '$' | '`' | ';' | '&' | '|' | '<' | '>' | '(' | ')' | '*'
                        | '?' | '#' | '~' | '!'
                )
        })
}

fn quote(arg: &str) -> String {
    if !needs_quoting(arg) {
        return arg.to_string();
    }
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Shell-like rendering, used for messages only.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// `None` when the child was terminated by a signal
    pub code: Option<i32>,
}

impl Outcome {
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        Outcome { code: Some(code) }
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Executes invocations and reports how they ended.
pub trait CommandRunner {
    /// Run `invocation` to completion.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the child process could not be started.
    fn run(&mut self, invocation: &Invocation) -> io::Result<Outcome>;
}

/// Runs invocations as real child processes that share this process's terminal.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> io::Result<Outcome> {
        debug!("Running `{invocation}` in {}", invocation.cwd.display());
        let mut command = ProcessCommand::new(&invocation.program);
        command.args(&invocation.args).current_dir(&invocation.cwd);
        if invocation.quiet {
            command.stdout(Stdio::null());
        }

        let start = Instant::now();
        let status = command.status()?;
        debug!(
            "`{invocation}` exited with {status} after {:.1?}",
            start.elapsed()
        );
        Ok(Outcome {
            code: status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_plain_args() {
        let inv = Invocation::new("git", ["add", "."], Path::new("/tmp"));
        assert_eq!(inv.to_string(), "git add .");
    }

    #[test]
    fn test_display_quotes_message() {
        let inv = Invocation::new("git", ["commit", "-m", "fix the \"thing\""], Path::new("/tmp"));
        assert_eq!(inv.to_string(), r#"git commit -m "fix the \"thing\"""#);
    }

    #[test]
    fn test_display_empty_arg() {
        let inv = Invocation::new("git", ["commit", "-m", ""], Path::new("/tmp"));
        assert_eq!(inv.to_string(), r#"git commit -m """#);
    }

    #[test]
    fn test_display_escapes_expansions() {
        let inv = Invocation::new("echo", ["$HOME `id`"], Path::new("/tmp"));
        assert_eq!(inv.to_string(), r#"echo "\$HOME \`id\`""#);
    }

    #[test]
    fn test_outcome_success() {
        assert!(Outcome::from_code(0).success());
        assert!(!Outcome::from_code(1).success());
        assert!(!Outcome { code: None }.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = SystemRunner;
        let ok = runner
            .run(&Invocation::new("sh", ["-c", "exit 0"], dir.path()))
            .unwrap();
        let failed = runner
            .run(&Invocation::new("sh", ["-c", "exit 3"], dir.path()))
            .unwrap();
        assert_eq!(ok.code, Some(0));
        assert_eq!(failed.code, Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_uses_invocation_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = SystemRunner;
        let outcome = runner
            .run(&Invocation::new("sh", ["-c", "touch marker"], dir.path()).quiet())
            .unwrap();
        assert!(outcome.success());
        assert!(dir.path().join("marker").exists());
    }

    #[test]
    fn test_system_runner_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let result = SystemRunner.run(&Invocation::new(
            "gitpush-definitely-not-a-program",
            Vec::<String>::new(),
            dir.path(),
        ));
        assert!(result.is_err());
    }
}
