//! Terminal reports for fatal errors.
//!
//! A report is a headline followed by the file it concerns, the causes that
//! led to it and hints the user can act on:
//!
//! ```text
//! error: requested mode for inspection is NOT installed: `ssr`
//!   = hint: Add the mode with `marina mode add ssr`
//! ```

use std::fmt::{self, Write};
use std::path::PathBuf;

/// Hints printed outside of a [`Diagnostic`].
pub mod suggestions {
    pub const NO_DESCRIPTOR: &str =
        "help: Run the command from a Marina project (a directory with marina.config.toml)";

    pub const PATH_NOT_FOUND: &str =
        "help: Run `marina inspect -d 1` to see the top-level keys";
}

const RED_BOLD: &str = "1;31";
const BLUE_BOLD: &str = "1;34";
const GREEN_BOLD: &str = "1;32";

/// A fatal error report.
#[derive(Debug, Clone, Default)]
pub struct Diagnostic {
    headline: String,
    file: Option<PathBuf>,
    causes: Vec<String>,
    hints: Vec<String>,
}

impl Diagnostic {
    pub fn error(headline: impl Into<String>) -> Self {
        Diagnostic {
            headline: headline.into(),
            ..Diagnostic::default()
        }
    }

    /// Name the file the error concerns.
    pub fn in_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn caused_by(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    /// Render the report, with ANSI styling when `color` is set.
    pub fn render(&self, color: bool) -> String {
        let paint = |code: &str, text: &str| {
            if color {
                format!("\x1b[{}m{}\x1b[0m", code, text)
            } else {
                text.to_string()
            }
        };

        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = writeln!(out, "{}: {}", paint(RED_BOLD, "error"), self.headline);
        if let Some(file) = &self.file {
            let _ = writeln!(out, "  {} {}", paint(BLUE_BOLD, "-->"), file.display());
        }
        for cause in &self.causes {
            let _ = writeln!(out, "  {} caused by: {}", paint(BLUE_BOLD, "="), cause);
        }
        for hint in &self.hints {
            let _ = writeln!(
                out,
                "  {} {}: {}",
                paint(BLUE_BOLD, "="),
                paint(GREEN_BOLD, "hint"),
                hint
            );
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}
