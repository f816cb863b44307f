//! Sink and progress traits
//!
//! These traits let the reconcile crate drive remote calls without
//! depending on a particular HTTP client or UI.

use crate::types::{ApplyResult, PlannedCall};
use anyhow::Result;

/// Destination for planned calls
///
/// Implement this trait to send calls to the remote service.
pub trait CallSink {
    /// Send one call, blocking until it completes
    fn dispatch(&self, call: &PlannedCall) -> Result<()>;
}

/// Progress callback for execution operations
///
/// Implement this trait to receive progress updates during execution.
pub trait ProgressCallback {
    /// Called before a call is dispatched
    fn on_call_start(&mut self, call: &PlannedCall);

    /// Called after a call completes successfully
    fn on_call_complete(&mut self, call: &PlannedCall, result: &ApplyResult);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_call_start(&mut self, _call: &PlannedCall) {}
    fn on_call_complete(&mut self, _call: &PlannedCall, _result: &ApplyResult) {}
}
