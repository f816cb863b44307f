//! # Reconcile
//!
//! A framework for reconciling declared resources against a live system.
//!
//! This crate holds the resource-agnostic half of a reconciliation run:
//! comparing a desired mapping with the live one, and turning the result
//! into ordered create/update/delete calls.
//!
//! ## Core Concepts
//!
//! - **ResourceMapping**: resource name to definition, for desired or live state
//! - **Diff**: the `add`, `remove` and `modify` partitions between the two
//! - **Strategy**: how two definitions of one resource are compared
//! - **KindAdapter**: per-kind path routing and payload shaping
//! - **CallSink**: where planned calls are sent
//!
//! ## Example
//!
//! ```
//! use reconcile::{
//!     compute, execute, mapping_from_value, Action, CallSink, ExecuteOptions,
//!     KindAdapter, NoProgress, PlannedCall, Strategy,
//! };
//! use serde_json::json;
//!
//! struct Policies;
//!
//! impl KindAdapter for Policies {
//!     fn path_prefix(&self) -> &str {
//!         "/v1/sys/policy/"
//!     }
//! }
//!
//! struct Print;
//!
//! impl CallSink for Print {
//!     fn dispatch(&self, call: &PlannedCall) -> anyhow::Result<()> {
//!         println!("{} {}", call.action, call.path);
//!         Ok(())
//!     }
//! }
//!
//! let desired = mapping_from_value(json!({"ops": "path \"*\" {}"})).unwrap();
//! let live = mapping_from_value(json!({"legacy": ""})).unwrap();
//!
//! let diff = compute(&desired, &live, Strategy::FullEquality);
//! assert!(diff.add.contains_key("ops"));
//! assert!(diff.remove.contains_key("legacy"));
//!
//! let summary = execute(&diff, &Policies, &Print, &ExecuteOptions::default(), &mut NoProgress)?;
//! assert_eq!(summary.total_changes(), 2);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Provider Traits
//!
//! - [`CallSink`]: Sends a planned call
//! - [`ProgressCallback`]: Receives progress updates
//!
//! This allows the crate to be used without hard dependencies on a
//! particular HTTP client or UI.

pub mod apply;
pub mod context;
pub mod diff;
pub mod error;
pub mod types;

// Re-export main types at crate root
pub use apply::{KindAdapter, execute, plan};
pub use context::{CallSink, NoProgress, ProgressCallback};
pub use diff::{Diff, DiffSummary, Strategy, compute};
pub use error::ApplyError;
pub use types::{
    Action, ApplyResult, AttributeMap, ExecuteOptions, ExecuteSummary, PlannedCall,
    ResourceMapping, mapping_from_value, merge_baseline,
};
