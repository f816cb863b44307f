//! Per-kind run loop: desired → live → diff → apply

use anyhow::{Context, Result};
use reconcile::{
    Action, ApplyResult, CallSink, ExecuteOptions, PlannedCall, ProgressCallback,
    ResourceMapping, compute, execute,
};
use vaultapi::VaultClient;

use super::report::KindReport;
use crate::progress;
use crate::resource::ManagedKind;

/// Options for one reconciliation run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Compute and report the diff without sending mutating calls
    pub dry_run: bool,
    /// Show a spinner while live state is fetched
    pub show_progress: bool,
}

/// Sends planned calls to the server
pub struct VaultSink<'a> {
    client: &'a VaultClient,
}

impl<'a> VaultSink<'a> {
    pub fn new(client: &'a VaultClient) -> Self {
        Self { client }
    }
}

impl CallSink for VaultSink<'_> {
    fn dispatch(&self, call: &PlannedCall) -> Result<()> {
        match call.action {
            Action::Create | Action::Update => {
                self.client.post(&call.path, call.payload.as_ref())?;
            }
            Action::Delete => {
                self.client.delete(&call.path)?;
            }
        }
        Ok(())
    }
}

/// Logs each applied change at info level
struct LogProgress<'a> {
    noun: &'a str,
}

impl ProgressCallback for LogProgress<'_> {
    fn on_call_start(&mut self, call: &PlannedCall) {
        log::debug!("{} {} '{}' at {}", call.action, self.noun, call.name, call.path);
    }

    fn on_call_complete(&mut self, call: &PlannedCall, result: &ApplyResult) {
        match result {
            ApplyResult::Created => log::info!("Created {} '{}'", self.noun, call.name),
            ApplyResult::Modified => log::info!("Updated {} '{}'", self.noun, call.name),
            ApplyResult::Removed => log::info!("Removed {} '{}'", self.noun, call.name),
            ApplyResult::Skipped { reason } => {
                log::info!("Would {} {} '{}' ({})", call.action, self.noun, call.name, reason);
            }
        }
    }
}

/// Reconcile one resource kind against the server
///
/// The desired document is prepared and merged with the kind's baseline,
/// live state is fetched, and the diff is applied in add → modify → remove
/// order. The first failing call aborts the run.
pub fn reconcile_kind(
    manager: &dyn ManagedKind,
    document: ResourceMapping,
    client: &VaultClient,
    opts: &RunOptions,
) -> Result<KindReport> {
    let kind = manager.kind();

    let desired = manager
        .desired_state(document)
        .with_context(|| format!("Invalid desired state for {kind}"))?;

    let spinner = progress::spinner(
        &format!("Reading {} from {}", kind.title().to_lowercase(), client.config().base_url),
        opts.show_progress,
    );
    let live = manager.fetch_live(client);
    progress::finish_clear(&spinner);
    let live = live.with_context(|| format!("Failed to read live {kind}"))?;

    let diff = compute(&desired, &live, manager.strategy());
    log::debug!(
        "{kind}: {} desired, {} live, {} to change",
        desired.len(),
        live.len(),
        diff.len()
    );

    let sink = VaultSink::new(client);
    let mut progress = LogProgress { noun: kind.noun() };
    let summary = execute(
        &diff,
        manager,
        &sink,
        &ExecuteOptions {
            dry_run: opts.dry_run,
        },
        &mut progress,
    )?;

    Ok(KindReport {
        kind,
        diff,
        summary,
    })
}
