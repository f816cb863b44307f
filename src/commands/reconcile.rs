//! Reconciliation commands
//!
//! - `apply` - Make one resource kind match its desired state
//! - `diff` - Preview what apply would change
//! - `sync` - Apply a combined document for every kind

use anyhow::Result;
use reconcile::ExecuteSummary;
use vaultapi::VaultClient;

use crate::Context;
use crate::cli::{ApplyArgs, ConnectionArgs, KindArgs, SyncArgs};
use crate::config::Settings;
use crate::desired;
use crate::engine::{self, KindReport, OutputFormat, RunOptions};
use crate::resource::Kind;
use crate::ui;

/// Build a client from flags, environment and the settings file
fn connect(conn: &ConnectionArgs) -> Result<VaultClient> {
    let settings = Settings::load(conn.config.as_deref())?;
    let config = settings.resolve(conn)?;
    log::debug!("Connecting to {config:?}");
    Ok(VaultClient::new(config))
}

fn run_kind(ctx: &Context, client: &VaultClient, args: &KindArgs, dry_run: bool) -> Result<KindReport> {
    let text = desired::read_source(args.desired.as_deref(), args.file.as_deref())?;
    let document = desired::parse_mapping(text.as_deref())?;

    let opts = RunOptions {
        dry_run,
        show_progress: !ctx.quiet,
    };
    engine::reconcile_kind(args.kind.manager().as_ref(), document, client, &opts)
}

fn print_report(reports: &[KindReport], format: OutputFormat) -> Result<()> {
    print!("{}", engine::render(reports, format)?);
    Ok(())
}

/// Apply the desired state of one kind
pub fn apply(ctx: &Context, conn: &ConnectionArgs, args: &ApplyArgs) -> Result<()> {
    let client = connect(conn)?;
    let report = run_kind(ctx, &client, &args.target, args.dry_run)?;

    if !ctx.quiet && !args.dry_run && report.summary.total_changes() > 0 {
        ui::hint(&changes_line(args.target.kind.title(), &report.summary));
    }

    print_report(&[report], args.target.format)
}

/// Show the diff of one kind without sending mutating calls
pub fn diff(ctx: &Context, conn: &ConnectionArgs, args: &KindArgs) -> Result<()> {
    let client = connect(conn)?;
    let report = run_kind(ctx, &client, args, true)?;

    let has_changes = !report.diff.is_empty();
    print_report(&[report], args.format)?;

    if has_changes && !ctx.quiet {
        ui::hint(&format!("Run 'vaultsync apply {}' to apply these changes", kind_arg(args.kind)));
    }
    Ok(())
}

/// Apply a combined document, kind by kind
///
/// Kinds run in [`Kind::ALL`] order; the first failure stops the sync and
/// kinds already applied stay applied.
pub fn sync(ctx: &Context, conn: &ConnectionArgs, args: &SyncArgs) -> Result<()> {
    let text = desired::read_source(args.desired.as_deref(), args.file.as_deref())?;
    let mut sections = desired::split_sections(text.as_deref())?;
    let client = connect(conn)?;

    let opts = RunOptions {
        dry_run: args.dry_run,
        show_progress: !ctx.quiet,
    };

    let mut reports = Vec::with_capacity(Kind::ALL.len());
    let mut totals = ExecuteSummary::default();
    for kind in Kind::ALL {
        let document = sections.remove(&kind).unwrap_or_default();
        log::info!("Reconciling {}", kind.title().to_lowercase());
        let report = engine::reconcile_kind(kind.manager().as_ref(), document, &client, &opts)?;
        totals.merge(&report.summary);
        reports.push(report);
    }

    if !ctx.quiet && !args.dry_run && totals.total_changes() > 0 {
        ui::hint(&changes_line("Sync", &totals));
    }

    print_report(&reports, args.format)
}

fn changes_line(title: &str, summary: &ExecuteSummary) -> String {
    format!(
        "{title}: {} created, {} updated, {} removed",
        summary.created, summary.modified, summary.removed
    )
}

/// The command-line spelling of a kind
fn kind_arg(kind: Kind) -> String {
    use clap::ValueEnum;
    kind.to_possible_value()
        .map_or_else(|| kind.to_string(), |v| v.get_name().to_string())
}
