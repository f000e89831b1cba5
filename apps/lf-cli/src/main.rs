//! # lf-cli
//!
//! Command-line interface for the laudo approval workflow.
//!
//! Every mutating command acts as a registered user (`--as <username>`):
//! - `lf laudo create/list/show/save/history/stats` — author and inspect laudos
//! - `lf review approve/reject/resubmit/finalize/tag` — move laudos through
//!   the approval pipeline
//! - `lf privilege grant/revoke/list` — delegate the finalize capability
//! - `lf user add/list` — manage the user directory
//! - `lf audit verify/tail` — inspect the tamper-evident transition log

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Laudo approval workflow CLI.
#[derive(Parser)]
#[command(name = "lf", version, about)]
struct Cli {
    /// Data directory holding laudos, users, and the audit log.
    #[arg(long, default_value = ".laudo")]
    data_dir: PathBuf,

    /// Username to act as.
    #[arg(long = "as", value_name = "USERNAME")]
    actor: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Author and inspect laudos.
    Laudo {
        #[command(subcommand)]
        command: commands::laudo::LaudoCommands,
    },
    /// Move laudos through the approval pipeline.
    Review {
        #[command(subcommand)]
        command: commands::review::ReviewCommands,
    },
    /// Delegate and revoke privileges.
    Privilege {
        #[command(subcommand)]
        command: commands::privilege::PrivilegeCommands,
    },
    /// Manage the user directory.
    User {
        #[command(subcommand)]
        command: commands::user::UserCommands,
    },
    /// Inspect the audit trail.
    Audit {
        #[command(subcommand)]
        command: commands::audit::AuditCommands,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context::open(&cli.data_dir)?;

    match &cli.command {
        Commands::Laudo { command } => {
            let actor = ctx.resolve_actor(require_actor(&cli)?)?;
            commands::laudo::execute(command, &ctx, &actor)
        }
        Commands::Review { command } => {
            let actor = ctx.resolve_actor(require_actor(&cli)?)?;
            commands::review::execute(command, &ctx, &actor)
        }
        Commands::Privilege { command } => {
            let actor = ctx.resolve_actor(require_actor(&cli)?)?;
            commands::privilege::execute(command, &ctx, &actor)
        }
        Commands::User { command } => commands::user::execute(command, &ctx),
        Commands::Audit { command } => commands::audit::execute(command, &ctx),
    }
}

fn require_actor(cli: &Cli) -> anyhow::Result<&str> {
    cli.actor
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("this command needs an acting user: pass --as <username>"))
}
