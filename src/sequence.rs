//! The stage, commit, push sequence

use std::io::Write;
use std::path::Path;

use log::{debug, error, info};
use thiserror::Error;

use crate::runner::{CommandRunner, Invocation};
use crate::theme::{self, Painter};

#[derive(Error, Debug)]
pub enum PushError {
    #[error("command failed: {command}")]
    CommandFailed {
        command: String,
        /// `None` when the command never started or was killed by a signal
        code: Option<i32>,
    },
    #[error("failed to write progress: {0}")]
    Io(#[from] std::io::Error),
}

/// One step of the sequence: an optional progress line and the command behind it.
#[derive(Debug, Clone)]
pub struct Step {
    pub message: Option<&'static str>,
    pub invocation: Invocation,
}

pub const STAGING: &str = "📂 Staging changes...";
pub const COMMITTING: &str = "🧾 Committing changes...";
pub const PUSHING: &str = "🚀 Pushing to remote...";
pub const DONE: &str = "✅ Done! Everything's pushed.";

/// Build the four steps, all running in `workdir`.
///
/// The message is passed as a single argument and never goes through a shell.
#[must_use]
pub fn plan(workdir: &Path, message: &str) -> Vec<Step> {
    vec![
        Step {
            message: None,
            invocation: Invocation::new("git", ["rev-parse", "--show-toplevel"], workdir)
                .quiet(),
        },
        Step {
            message: Some(STAGING),
            invocation: Invocation::new("git", ["add", "."], workdir),
        },
        Step {
            message: Some(COMMITTING),
            invocation: Invocation::new("git", ["commit", "-m", message], workdir),
        },
        Step {
            message: Some(PUSHING),
            invocation: Invocation::new("git", ["push"], workdir),
        },
    ]
}

fn report_failure(
    out: &mut impl Write,
    painter: Painter,
    invocation: &Invocation,
    code: Option<i32>,
) -> PushError {
    let command = invocation.to_string();
    let warning = format!("⚠️ Command failed: {command}");
    if let Err(e) = writeln!(out, "{}", painter.paint(theme::FAILURE, &warning)) {
        return PushError::Io(e);
    }
    PushError::CommandFailed { command, code }
}

/// Run `steps` in order, stopping at the first one that fails.
///
/// # Errors
///
/// Returns `PushError::CommandFailed` after printing a warning when a command
/// exits non-zero or cannot be started, and `PushError::Io` if progress output
/// cannot be written.
pub fn run(
    runner: &mut impl CommandRunner,
    steps: &[Step],
    out: &mut impl Write,
    painter: Painter,
) -> Result<(), PushError> {
    for (i, step) in steps.iter().enumerate() {
        if let Some(message) = step.message {
            writeln!(out, "{}", painter.paint(theme::PROGRESS, message))?;
            out.flush()?;
        }

        let outcome = match runner.run(&step.invocation) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Unable to start `{}`: {e}", step.invocation);
                return Err(report_failure(out, painter, &step.invocation, None));
            }
        };

        if !outcome.success() {
            debug!(
                "Step {}/{} failed with {:?}, stopping",
                i + 1,
                steps.len(),
                outcome.code
            );
            return Err(report_failure(out, painter, &step.invocation, outcome.code));
        }
        info!("Step {}/{} succeeded: {}", i + 1, steps.len(), step.invocation);
    }

    writeln!(out, "{}", painter.paint(theme::SUCCESS, DONE))?;
    Ok(())
}
