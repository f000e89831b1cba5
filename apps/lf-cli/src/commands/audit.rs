// audit.rs — Audit trail subcommands: verify, tail.

use clap::Subcommand;

use lf_audit::{AuditError, AuditLog};

use super::Context;

#[derive(Subcommand)]
pub enum AuditCommands {
    /// Verify the hash chain over the whole transition log.
    Verify,
    /// Show the most recent transitions.
    Tail {
        /// Number of entries to show.
        #[arg(long)]
        lines: Option<usize>,
    },
}

pub fn execute(cmd: &AuditCommands, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        AuditCommands::Verify => verify(ctx),
        AuditCommands::Tail { lines } => tail(ctx, lines.unwrap_or(ctx.config.display.tail_lines)),
    }
}

fn verify(ctx: &Context) -> anyhow::Result<()> {
    if !ctx.paths.audit_path.exists() {
        println!("No audit log yet; nothing to verify.");
        return Ok(());
    }

    match AuditLog::verify_chain(&ctx.paths.audit_path) {
        Ok(_) => {
            let entries = AuditLog::read_all(&ctx.paths.audit_path)?;
            println!("Audit chain OK ({} entries).", entries.len());
            Ok(())
        }
        Err(AuditError::IntegrityViolation { line, .. }) => anyhow::bail!(
            "audit chain broken at line {}: the transition log has been tampered with",
            line
        ),
        Err(e) => Err(e.into()),
    }
}

fn tail(ctx: &Context, lines: usize) -> anyhow::Result<()> {
    if !ctx.paths.audit_path.exists() {
        println!("No audit log yet.");
        return Ok(());
    }

    let entries = AuditLog::read_all(&ctx.paths.audit_path)?;
    let start = entries.len().saturating_sub(lines);

    for e in &entries[start..] {
        let reason = e
            .reason
            .as_deref()
            .map(|r| format!("  ({})", r))
            .unwrap_or_default();
        println!(
            "{}  laudo={}  {} → {}  v{}{}",
            e.timestamp.to_rfc3339(),
            e.laudo_id,
            e.from_status,
            e.to_status,
            e.version,
            reason,
        );
    }
    println!("\n{} of {} entries shown.", entries.len() - start, entries.len());
    Ok(())
}
