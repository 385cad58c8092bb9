//! Operator-facing progress output.
//!
//! One line per event, written to any [`Write`] sink. The binary passes
//! stdout; tests pass a `Vec<u8>`.

use std::fmt::Display;
use std::io::{self, Write};

/// Maximum number of characters of a statement shown in progress lines.
pub const PREVIEW_LEN: usize = 120;

/// How much progress output to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportStyle {
    /// Only statement failures and the final summary.
    Terse,
    /// Connection progress, every statement and its outcome.
    #[default]
    Verbose,
}

/// Writes progress lines for a schema run.
pub struct ProgressReporter<W> {
    out: W,
    style: ReportStyle,
}

impl<W: Write> ProgressReporter<W> {
    pub fn new(out: W, style: ReportStyle) -> Self {
        Self { out, style }
    }

    pub fn connecting(&mut self) -> io::Result<()> {
        self.verbose_line(format_args!("Connecting to database..."))
    }

    pub fn connected(&mut self, total: usize) -> io::Result<()> {
        self.verbose_line(format_args!("Connected. Executing {total} statements..."))
    }

    /// Announce statement `index` (1-based) of `total`.
    pub fn executing(&mut self, index: usize, total: usize, statement: &str) -> io::Result<()> {
        self.verbose_line(format_args!(
            "[{index}/{total}] Executing: {}...",
            preview(statement, PREVIEW_LEN)
        ))
    }

    pub fn succeeded(&mut self) -> io::Result<()> {
        self.verbose_line(format_args!("  -> OK"))
    }

    pub fn failed(&mut self, error: &dyn Display) -> io::Result<()> {
        match self.style {
            ReportStyle::Terse => writeln!(
                self.out,
                "Error executing statement (continuing): {error}"
            ),
            ReportStyle::Verbose => writeln!(self.out, "  -> ERROR: {error}"),
        }
    }

    pub fn applied(&mut self) -> io::Result<()> {
        writeln!(self.out, "Schema applied successfully")?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn verbose_line(&mut self, line: std::fmt::Arguments<'_>) -> io::Result<()> {
        if self.style == ReportStyle::Verbose {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }
}

/// First line of the trimmed statement, cut to at most `max_chars` characters.
pub fn preview(statement: &str, max_chars: usize) -> &str {
    let first_line = statement.trim().lines().next().unwrap_or("");
    match first_line.char_indices().nth(max_chars) {
        Some((cut, _)) => &first_line[..cut],
        None => first_line,
    }
}
