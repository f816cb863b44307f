//! Progress indicators for vaultsync.
//!
//! Spinners draw on stderr and hide themselves when stderr is not a
//! terminal, so the report on stdout stays clean.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Start a spinner with a message, or a hidden bar when `enabled` is false
pub fn spinner(msg: &str, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Clear a spinner from the terminal
pub fn finish_clear(pb: &ProgressBar) {
    pb.finish_and_clear();
}
