//! Apply engine - turns a diff into ordered remote calls

use crate::context::{CallSink, ProgressCallback};
use crate::diff::Diff;
use crate::error::ApplyError;
use crate::types::{Action, ApplyResult, ExecuteOptions, ExecuteSummary, PlannedCall};
use anyhow::{Context, Result};
use serde_json::Value;

/// Resource-specific shaping of calls
///
/// The engine owns ordering and path joining; the adapter decides where a
/// resource lives under the prefix and what body to send.
pub trait KindAdapter {
    /// Collection path every call is built under, e.g. `/v1/sys/policy/`
    fn path_prefix(&self) -> &str;

    /// Path segment after the prefix for this resource
    ///
    /// `attrs` is the desired definition for create/update and the live
    /// definition for delete.
    fn route(&self, _action: Action, name: &str, _attrs: &Value) -> Result<String, ApplyError> {
        Ok(name.to_string())
    }

    /// Body to send, built as a new value (the diff is never mutated)
    ///
    /// Return `None` for body-less calls. The default sends the definition
    /// unchanged for create/update and nothing for delete.
    fn payload(&self, action: Action, _name: &str, attrs: &Value) -> Result<Option<Value>, ApplyError> {
        Ok(match action {
            Action::Create | Action::Update => Some(attrs.clone()),
            Action::Delete => None,
        })
    }
}

/// Plan the calls for a diff in the order add → modify → remove
///
/// Removals come last so nothing is deleted while a later step of the same
/// pass may still depend on it.
pub fn plan(diff: &Diff, adapter: &dyn KindAdapter) -> Result<Vec<PlannedCall>, ApplyError> {
    let partitions = [
        (Action::Create, &diff.add),
        (Action::Update, &diff.modify),
        (Action::Delete, &diff.remove),
    ];

    let mut calls = Vec::with_capacity(diff.len());
    for (action, entries) in partitions {
        for (name, attrs) in entries {
            let segment = adapter.route(action, name, attrs)?;
            calls.push(PlannedCall {
                action,
                name: name.clone(),
                path: format!("{}{}", adapter.path_prefix(), segment),
                payload: adapter.payload(action, name, attrs)?,
            });
        }
    }

    Ok(calls)
}

/// Execute a diff through a sink
///
/// Calls are planned up front, so a shaping error aborts before anything is
/// sent. Calls are then dispatched strictly one after another; the first
/// failure stops the run and earlier calls stay applied.
///
/// # Arguments
/// * `diff` - The diff to apply
/// * `adapter` - Shapes paths and payloads for the resource kind
/// * `sink` - Sends each call
/// * `opts` - Execution options (dry_run)
/// * `progress` - Progress callback
///
/// # Returns
/// Summary of execution results
pub fn execute<P: ProgressCallback>(
    diff: &Diff,
    adapter: &dyn KindAdapter,
    sink: &dyn CallSink,
    opts: &ExecuteOptions,
    progress: &mut P,
) -> Result<ExecuteSummary> {
    let calls = plan(diff, adapter)?;
    let mut summary = ExecuteSummary::default();

    for call in &calls {
        progress.on_call_start(call);

        let result = if opts.dry_run {
            ApplyResult::Skipped {
                reason: "Dry run".to_string(),
            }
        } else {
            sink.dispatch(call)
                .with_context(|| format!("Failed to {} '{}' at {}", call.action, call.name, call.path))?;
            ApplyResult::from_action(call.action)
        };

        progress.on_call_complete(call, &result);
        summary.add_result(&result);
    }

    Ok(summary)
}
