//! Terminal styling for command output.

use colored::{ColoredString, Colorize};
use http::StatusCode;

/// Width of the key column in [`field`] lines.
const KEY_WIDTH: usize = 12;

/// How a status line should read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tone {
    /// The operation did what was asked.
    Good,
    /// The operation failed.
    Bad,
    /// Completed, but not the way the user probably wanted.
    Caution,
    /// Neutral information.
    Note,
    /// Background detail.
    Quiet,
}

impl Tone {
    fn marker(self) -> ColoredString {
        match self {
            Self::Good => "✓".green(),
            Self::Bad => "✗".red(),
            Self::Caution => "!".yellow(),
            Self::Note => "i".blue(),
            Self::Quiet => "·".dimmed(),
        }
    }

    fn paint(self, text: &str) -> ColoredString {
        match self {
            Self::Good | Self::Note => text.normal(),
            Self::Bad => text.red(),
            Self::Caution => text.yellow(),
            Self::Quiet => text.dimmed(),
        }
    }
}

/// A marked status line.
pub(crate) fn line(tone: Tone, text: &str) -> String {
    format!("{} {}", tone.marker(), tone.paint(text))
}

/// A section title.
pub(crate) fn title(text: &str) -> String {
    text.bold().cyan().to_string()
}

/// An indented `key: value` line with the key column aligned.
pub(crate) fn field(key: &str, value: &str) -> String {
    let key = format!("{key}:");
    format!("  {} {value}", format!("{key:<KEY_WIDTH$}").dimmed())
}

/// A horizontal rule between sections.
pub(crate) fn rule() -> String {
    "━".repeat(50).dimmed().to_string()
}

/// Tone for a router response status.
pub(crate) fn status_tone(status: StatusCode) -> Tone {
    if status.is_success() {
        Tone::Good
    } else if status.is_client_error() {
        Tone::Caution
    } else {
        Tone::Bad
    }
}
