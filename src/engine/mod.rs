//! Reconciliation engine for vaultsync
//!
//! The engine orchestrates one run per resource kind:
//! 1. Desired - Prepare the document and merge the baseline
//! 2. Live - Fetch and normalize the server's state
//! 3. Diffing - Compute add/remove/modify partitions
//! 4. Applying - Send the calls in add → modify → remove order

pub mod report;
pub mod runner;

pub use report::{KindReport, OutputFormat, render};
pub use runner::{RunOptions, reconcile_kind};
