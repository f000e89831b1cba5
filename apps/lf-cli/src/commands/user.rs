// user.rs — User directory subcommands: add, list.

use anyhow::bail;
use clap::Subcommand;

use lf_laudo::Role;

use super::Context;

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user. Role is fixed at creation.
    Add {
        /// Username (unique).
        username: String,
        /// Role: tecnico, encarregado, vendedor, or admin.
        role: String,
    },
    /// List all registered users.
    List,
}

pub fn execute(cmd: &UserCommands, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Add { username, role } => add(ctx, username, role),
        UserCommands::List => list(ctx),
    }
}

fn add(ctx: &Context, username: &str, role: &str) -> anyhow::Result<()> {
    let role = parse_role(role)?;
    let mut users = ctx.users()?;
    let user = users.add(username, role)?;
    println!("User registered: {} ({}, {})", user.username, user.role, user.id);
    Ok(())
}

fn list(ctx: &Context) -> anyhow::Result<()> {
    let users = ctx.users()?;
    let all = users.list();

    if all.is_empty() {
        println!("No users registered.");
        return Ok(());
    }

    println!("{:<38} {:<16} {:<12}", "ID", "USERNAME", "ROLE");
    println!("{}", "-".repeat(66));
    for u in all {
        println!("{:<38} {:<16} {:<12}", u.id, u.username, u.role.to_string());
    }
    Ok(())
}

fn parse_role(s: &str) -> anyhow::Result<Role> {
    match s {
        "tecnico" => Ok(Role::Tecnico),
        "encarregado" => Ok(Role::Encarregado),
        "vendedor" => Ok(Role::Vendedor),
        "admin" => Ok(Role::Admin),
        other => bail!("unknown role: {} (expected tecnico, encarregado, vendedor, or admin)", other),
    }
}
