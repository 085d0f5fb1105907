//! Terminal styling helpers
//!
//! Output goes through `anstream`, which strips ANSI codes when stdout is not
//! a terminal, so styling here is unconditional.

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;
use std::fmt::Display;

/// Success marker
pub const CHECK: &str = "✓";
/// Skip/warning marker
pub const WARN: &str = "!";

/// Semantic styling for anything displayable
pub trait Stylize {
    /// Headings and labels
    fn emphasis(&self) -> String;
    /// Secondary information
    fn muted(&self) -> String;
    /// Values worth noticing (ids, names, counts)
    fn accent(&self) -> String;
    /// Completed work
    fn success(&self) -> String;
    /// Skipped or degraded work
    fn warning(&self) -> String;
    /// Failures
    fn failure(&self) -> String;
}

impl<T: Display> Stylize for T {
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn success(&self) -> String {
        self.green().to_string()
    }

    fn warning(&self) -> String {
        self.yellow().to_string()
    }

    fn failure(&self) -> String {
        self.red().bold().to_string()
    }
}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Yellow warning marker
pub fn warn_mark() -> String {
    WARN.warning()
}

/// Spinner used while waiting on the API
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}
