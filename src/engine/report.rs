//! Rendering of reconciliation results

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use reconcile::{Diff, DiffSummary, ExecuteSummary};
use serde_json::{Map, Value};
use std::fmt::{self, Write};

use crate::resource::Kind;

/// Outcome of reconciling one kind
#[derive(Debug, Clone)]
pub struct KindReport {
    pub kind: Kind,
    pub diff: Diff,
    pub summary: ExecuteSummary,
}

/// Report output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `{add, remove, modify}` as YAML
    #[default]
    Yaml,
    /// Same structure as JSON
    Json,
    /// Colored human-readable summary
    Pretty,
}

/// Render reports in the given format
///
/// A single report renders its diff directly; several reports are keyed by
/// their section name (`auth_methods`, `policies`, `userpasses`).
pub fn render(reports: &[KindReport], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&structured(reports)?)?),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(&structured(reports)?)?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Pretty => Ok(pretty(reports)?),
    }
}

fn structured(reports: &[KindReport]) -> Result<Value> {
    if let [report] = reports {
        return Ok(serde_json::to_value(&report.diff)?);
    }

    let mut sections = Map::new();
    for report in reports {
        sections.insert(
            report.kind.document_key().to_string(),
            serde_json::to_value(&report.diff)?,
        );
    }
    Ok(Value::Object(sections))
}

fn pretty(reports: &[KindReport]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let mut totals = DiffSummary::default();
    let dry_run = reports.iter().any(|r| r.summary.skipped > 0);

    let title = if dry_run { "Planned Changes" } else { "Changes" };
    writeln!(out)?;
    writeln!(
        out,
        "┌─ {} ─────────────────────────────────────────┐",
        title.bold()
    )?;
    writeln!(out, "│")?;

    for report in reports {
        writeln!(out, "│ {}", report.kind.title().bold())?;

        if report.diff.is_empty() {
            writeln!(out, "│   {}", "no changes".dimmed())?;
        }
        for name in report.diff.add.keys() {
            writeln!(out, "│   {} {}", "+".green(), name)?;
        }
        for name in report.diff.modify.keys() {
            writeln!(out, "│   {} {}", "~".yellow(), name)?;
        }
        for name in report.diff.remove.keys() {
            writeln!(out, "│   {} {}", "-".red(), name)?;
        }
        writeln!(out, "│")?;

        totals.merge(&report.diff.summary());
    }

    writeln!(
        out,
        "└─ {} to add, {} to change, {} to remove ──────────────────┘",
        totals.additions.to_string().green(),
        totals.modifications.to_string().yellow(),
        totals.removals.to_string().red()
    )?;

    if !totals.has_changes() {
        writeln!(out, "  {} Already in sync", "✓".green())?;
    } else if dry_run {
        writeln!(out, "  {} Dry run: nothing was sent", "ℹ".blue())?;
    }

    Ok(out)
}
