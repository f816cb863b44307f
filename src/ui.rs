//! Terminal messages
//!
//! Everything here goes to stderr so stdout carries only the report.

use colored::Colorize;

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a hint or follow-up suggestion
pub fn hint(msg: &str) {
    eprintln!("{} {}", "ℹ".blue(), msg.dimmed());
}
