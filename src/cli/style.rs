//! Terminal styling helpers
//!
//! Output goes through `anstream`, which strips the ANSI codes when the
//! stream does not support color.

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;
use std::fmt::Display;

/// Semantic text styles
pub trait Stylize {
    /// Values the user may want to copy (ids, hosts, commands)
    fn accent(&self) -> String;
    /// Secondary text
    fn muted(&self) -> String;
    /// Headings
    fn emphasis(&self) -> String;
}

impl<T: Display> Stylize for T {
    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn emphasis(&self) -> String {
        self.bold().to_string()
    }
}

/// Success marker
pub fn check() -> String {
    "✓".green().to_string()
}

/// Failure marker
pub fn cross() -> String {
    "✗".red().to_string()
}

/// Warning marker
pub fn caution() -> String {
    "!".yellow().bold().to_string()
}

/// Spinner used while waiting on the backend
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
