// privilege.rs — Privilege administration: grant, revoke, list.

use anyhow::bail;
use clap::Subcommand;

use lf_laudo::{Actor, Privilege, Role};

use super::Context;

#[derive(Subcommand)]
pub enum PrivilegeCommands {
    /// Grant `finalize_laudos` to a technician.
    Grant {
        /// Username of the technician.
        username: String,
    },
    /// Revoke `finalize_laudos` from a user.
    Revoke {
        /// Username.
        username: String,
    },
    /// List all grant records, including revoked ones.
    List,
}

pub fn execute(cmd: &PrivilegeCommands, ctx: &Context, actor: &Actor) -> anyhow::Result<()> {
    // Only admins administer privileges.
    if actor.role != Role::Admin {
        bail!("unauthorized: only admins can manage privileges");
    }

    match cmd {
        PrivilegeCommands::Grant { username } => grant(ctx, actor, username),
        PrivilegeCommands::Revoke { username } => revoke(ctx, username),
        PrivilegeCommands::List => list(ctx),
    }
}

fn grant(ctx: &Context, actor: &Actor, username: &str) -> anyhow::Result<()> {
    let users = ctx.users()?;
    let user = match users.find_by_username(username) {
        Some(u) => u.clone(),
        None => bail!("unknown user: {}", username),
    };

    let mut registry = ctx.privileges()?;
    let granted = registry.grant(user.id, user.role, Privilege::FinalizeLaudos, actor.id)?;
    if granted {
        println!("Granted finalize_laudos to {}.", username);
    } else {
        println!("{} already holds finalize_laudos; nothing to do.", username);
    }
    Ok(())
}

fn revoke(ctx: &Context, username: &str) -> anyhow::Result<()> {
    let users = ctx.users()?;
    let user = match users.find_by_username(username) {
        Some(u) => u.clone(),
        None => bail!("unknown user: {}", username),
    };

    let mut registry = ctx.privileges()?;
    let revoked = registry.revoke(user.id, Privilege::FinalizeLaudos)?;
    if revoked {
        println!("Revoked finalize_laudos from {}.", username);
    } else {
        println!("{} holds no active finalize_laudos grant.", username);
    }
    Ok(())
}

fn list(ctx: &Context) -> anyhow::Result<()> {
    let registry = ctx.privileges()?;
    let users = ctx.users()?;
    let grants = registry.all();

    if grants.is_empty() {
        println!("No privilege grants recorded.");
        return Ok(());
    }

    println!("{:<16} {:<18} {:<8} {:<26}", "USER", "PRIVILEGE", "ACTIVE", "GRANTED");
    println!("{}", "-".repeat(70));
    for g in grants {
        let username = users
            .get(g.user_id)
            .map(|u| u.username.clone())
            .unwrap_or_else(|| g.user_id.to_string());
        println!(
            "{:<16} {:<18} {:<8} {:<26}",
            username,
            g.privilege.to_string(),
            if g.is_active { "yes" } else { "no" },
            g.granted_at.to_rfc3339(),
        );
    }
    Ok(())
}
