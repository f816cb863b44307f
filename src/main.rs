mod cli;
mod commands;
mod config;
mod desired;
mod engine;
mod progress;
mod resource;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;
use std::process::ExitCode;

/// Global context for the application
pub struct Context {
    pub quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ui::error(&format!("{err:#}"));
            if let Some(advice) = advice_for(&err) {
                ui::hint(&advice);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = Context { quiet: cli.quiet };

    match &cli.command {
        Command::Apply(args) => commands::reconcile::apply(&ctx, &cli.connection, args),
        Command::Diff(args) => commands::reconcile::diff(&ctx, &cli.connection, args),
        Command::Sync(args) => commands::reconcile::sync(&ctx, &cli.connection, args),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "vaultsync", &mut io::stdout());
            Ok(())
        }
    }
}

/// Category advice for a failed remote call anywhere in the error chain
fn advice_for(err: &anyhow::Error) -> Option<String> {
    let remote = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<vaultapi::Error>())?;
    let category = remote.category();
    Some(format!("{}: {}", category.description(), category.advice()))
}
