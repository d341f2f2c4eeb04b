use std::io::IsTerminal;

use anstyle::{AnsiColor, Color, Reset, Style};

pub const SUCCESS: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));
pub const FAILURE: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));
pub const PROGRESS: Style = Style::new().bold();

/// Console painter, only emits escape codes when enabled.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    color: bool,
}

impl Painter {
    /// Color only when stdout is a terminal.
    #[must_use]
    pub fn for_stdout() -> Self {
        Self {
            color: std::io::stdout().is_terminal(),
        }
    }

    #[must_use]
    pub fn plain() -> Self {
        Self { color: false }
    }

    #[must_use]
    pub fn paint(&self, style: Style, s: &str) -> String {
        if self.color {
            format!("{style}{s}{Reset}")
        } else {
            s.to_string()
        }
    }
}
