// review.rs — Review subcommands: approve, reject, resubmit, finalize, tag.

use clap::Subcommand;

use lf_laudo::{Actor, LaudoStatus};

use super::{engine_failure, parse_laudo_id, Context};

#[derive(Subcommand)]
pub enum ReviewCommands {
    /// Approve the current review stage of a laudo.
    Approve {
        /// Laudo ID.
        id: String,
        /// Version this decision was made against; refused if stale.
        #[arg(long)]
        expected_version: Option<u64>,
    },
    /// Reject a laudo under review. A reason is mandatory.
    Reject {
        /// Laudo ID.
        id: String,
        /// Why the laudo is being sent back.
        #[arg(long)]
        reason: String,
    },
    /// Resubmit a rejected laudo for a fresh review cycle (owner only).
    Resubmit {
        /// Laudo ID.
        id: String,
    },
    /// Finalize a fully-approved laudo.
    Finalize {
        /// Laudo ID.
        id: String,
        /// Version this decision was made against; refused if stale.
        #[arg(long)]
        expected_version: Option<u64>,
    },
    /// Tag a finalized laudo (e.g., warranty notes).
    Tag {
        /// Laudo ID.
        id: String,
        /// Short tag label (e.g., "garantia").
        tag: String,
        /// Free-text description.
        #[arg(long)]
        description: Option<String>,
    },
}

pub fn execute(cmd: &ReviewCommands, ctx: &Context, actor: &Actor) -> anyhow::Result<()> {
    match cmd {
        ReviewCommands::Approve {
            id,
            expected_version,
        } => approve(ctx, actor, id, *expected_version),
        ReviewCommands::Reject { id, reason } => reject(ctx, actor, id, reason),
        ReviewCommands::Resubmit { id } => resubmit(ctx, actor, id),
        ReviewCommands::Finalize {
            id,
            expected_version,
        } => finalize(ctx, actor, id, *expected_version),
        ReviewCommands::Tag {
            id,
            tag,
            description,
        } => tag_laudo(ctx, actor, id, tag, description.clone()),
    }
}

fn approve(
    ctx: &Context,
    actor: &Actor,
    id: &str,
    expected_version: Option<u64>,
) -> anyhow::Result<()> {
    let laudo_id = parse_laudo_id(id)?;
    let mut coordinator = ctx.coordinator()?;

    // The next stage follows from where the laudo currently sits.
    let current = ctx.store()?.load(laudo_id).map_err(engine_failure)?;
    let next = match current.status {
        LaudoStatus::EmAndamento => LaudoStatus::AprovadoManutencao,
        LaudoStatus::AprovadoManutencao => LaudoStatus::AprovadoVendas,
        other => anyhow::bail!(
            "laudo is {}, nothing to approve (use `lf review finalize` for the last gate)",
            other
        ),
    };

    let updated = coordinator
        .apply(laudo_id, next, actor, None, expected_version)
        .map_err(engine_failure)?;
    println!(
        "Approved: {} is now {} (version {})",
        updated.id, updated.status, updated.version
    );
    Ok(())
}

fn reject(ctx: &Context, actor: &Actor, id: &str, reason: &str) -> anyhow::Result<()> {
    let laudo_id = parse_laudo_id(id)?;
    let mut coordinator = ctx.coordinator()?;
    let updated = coordinator
        .reject(laudo_id, actor, reason)
        .map_err(engine_failure)?;
    println!("Rejected: {} ({})", updated.id, reason.trim());
    Ok(())
}

fn resubmit(ctx: &Context, actor: &Actor, id: &str) -> anyhow::Result<()> {
    let laudo_id = parse_laudo_id(id)?;
    let mut coordinator = ctx.coordinator()?;
    let updated = coordinator
        .resubmit(laudo_id, actor)
        .map_err(engine_failure)?;
    println!(
        "Resubmitted: {} is back in {} (rework cycle {})",
        updated.id, updated.status, updated.resubmission_count
    );
    Ok(())
}

fn finalize(
    ctx: &Context,
    actor: &Actor,
    id: &str,
    expected_version: Option<u64>,
) -> anyhow::Result<()> {
    let laudo_id = parse_laudo_id(id)?;
    let mut coordinator = ctx.coordinator()?;
    let updated = coordinator
        .apply(
            laudo_id,
            LaudoStatus::Finalizado,
            actor,
            None,
            expected_version,
        )
        .map_err(engine_failure)?;
    println!("Finalized: {} (version {})", updated.id, updated.version);
    Ok(())
}

fn tag_laudo(
    ctx: &Context,
    actor: &Actor,
    id: &str,
    tag: &str,
    description: Option<String>,
) -> anyhow::Result<()> {
    let laudo_id = parse_laudo_id(id)?;
    let mut coordinator = ctx.coordinator()?;
    let updated = coordinator
        .annotate(laudo_id, actor, tag, description)
        .map_err(engine_failure)?;
    println!("Tagged: {} as \"{}\"", updated.id, tag);
    Ok(())
}
