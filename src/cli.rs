use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::engine::OutputFormat;
use crate::resource::Kind;

#[derive(Parser)]
#[command(name = "vaultsync")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(
    about = "Reconcile Vault auth methods, policies and userpass accounts with a desired state",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Where and as whom to connect
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Server address, e.g. https://vault.internal:8200
    #[arg(long, env = "VAULT_ADDR", global = true)]
    pub url: Option<String>,

    /// Access token
    #[arg(long, env = "VAULT_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Namespace sent with every request
    #[arg(long, env = "VAULT_NAMESPACE", global = true)]
    pub namespace: Option<String>,

    /// Settings file (default: ~/.config/vaultsync/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Make the server match the desired state for one resource kind
    Apply(ApplyArgs),

    /// Show what apply would change, without changing anything
    Diff(KindArgs),

    /// Apply a combined document covering every resource kind
    Sync(SyncArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Desired state for a single resource kind
#[derive(Args, Debug, Clone)]
pub struct KindArgs {
    /// Resource kind to reconcile
    #[arg(value_enum)]
    pub kind: Kind,

    /// Desired state inline (YAML or JSON); absent means empty
    #[arg(short, long)]
    pub desired: Option<String>,

    /// Read the desired state from a file
    #[arg(short, long, conflicts_with = "desired")]
    pub file: Option<String>,

    /// Report format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub target: KindArgs,

    /// Dry run - show what would be done
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Combined document with auth_methods, policies and userpasses sections
    #[arg(short, long)]
    pub file: Option<String>,

    /// Combined document inline
    #[arg(short, long, conflicts_with = "file")]
    pub desired: Option<String>,

    /// Dry run - show what would be done
    #[arg(long)]
    pub dry_run: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}
