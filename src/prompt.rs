use std::io::{BufRead, IsTerminal, Write};

use log::debug;
use thiserror::Error;

pub const PROMPT: &str = "📝 Enter commit message:";

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("unable to read commit message: {0}")]
    Io(#[from] std::io::Error),
    #[error("commit message prompt interrupted: {0}")]
    Interrupted(#[from] inquire::InquireError),
}

/// Read one line from `input`, echoing the prompt to `out` first.
///
/// Only the line terminator is removed; the rest is returned verbatim, empty included.
///
/// # Errors
///
/// Returns `PromptError::Io` if writing the prompt or reading the line fails.
pub fn read_line(input: &mut impl BufRead, out: &mut impl Write) -> Result<String, PromptError> {
    write!(out, "{PROMPT} ")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}

/// Ask for the commit message, using an interactive prompt on terminals.
///
/// # Errors
///
/// Returns `PromptError::Interrupted` if the user cancels the interactive prompt,
/// or `PromptError::Io` when reading piped input fails.
pub fn ask_message() -> Result<String, PromptError> {
    if std::io::stdin().is_terminal() && std::io::stdout().is_terminal() {
        debug!("Prompting for commit message interactively");
        Ok(inquire::Text::new(PROMPT).prompt()?)
    } else {
        debug!("Reading commit message from piped stdin");
        let message = read_line(&mut std::io::stdin().lock(), &mut std::io::stdout())?;
        println!();
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(input: &str) -> (String, String) {
        let mut out = Vec::new();
        let message = read_line(&mut input.as_bytes(), &mut out).unwrap();
        (message, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_strips_newline_only() {
        let (message, prompt) = read("  fix: things  \n");
        assert_eq!(message, "  fix: things  ");
        assert_eq!(prompt, format!("{PROMPT} "));
    }

    #[test]
    fn test_strips_crlf() {
        assert_eq!(read("windows\r\n").0, "windows");
    }

    #[test]
    fn test_empty_line_accepted() {
        assert_eq!(read("\n").0, "");
    }

    #[test]
    fn test_eof_gives_empty_message() {
        assert_eq!(read("").0, "");
    }

    #[test]
    fn test_reads_first_line_only() {
        assert_eq!(read("first\nsecond\n").0, "first");
    }

    #[test]
    fn test_quotes_kept_verbatim() {
        assert_eq!(read("say \"hi\"\n").0, "say \"hi\"");
    }
}
