// laudo.rs — Laudo subcommands: create, list, show, save, history.

use clap::Subcommand;

use lf_engine::QueryProjector;
use lf_laudo::{Actor, Laudo, LaudoStatus};

use super::{engine_failure, parse_laudo_id, Context};

#[derive(Subcommand)]
pub enum LaudoCommands {
    /// Create a new draft laudo.
    Create {
        /// Customer name.
        cliente: String,
        /// Equipment under inspection (e.g., "Bateria tracionária 80V").
        equipamento: String,
        /// Technical diagnosis.
        #[arg(long, default_value = "")]
        diagnostico: String,
        /// Proposed solution.
        #[arg(long, default_value = "")]
        solucao: String,
    },
    /// List laudos visible to the acting user.
    List {
        /// Filter by status (e.g., "em_andamento", "finalizado").
        #[arg(long)]
        status: Option<String>,
        /// Show only the acting user's work queue.
        #[arg(long)]
        pending: bool,
    },
    /// Show details for one laudo.
    Show {
        /// Laudo ID.
        id: String,
    },
    /// Re-save draft fields (owner only, draft stage only).
    Save {
        /// Laudo ID.
        id: String,
        /// Updated diagnosis.
        #[arg(long)]
        diagnostico: Option<String>,
        /// Updated solution.
        #[arg(long)]
        solucao: Option<String>,
    },
    /// Show the audited transition history of a laudo.
    History {
        /// Laudo ID.
        id: String,
    },
    /// Per-status counts across the whole store.
    Stats,
    /// Recently tagged laudos.
    Tags {
        /// Number of entries to show.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

pub fn execute(cmd: &LaudoCommands, ctx: &Context, actor: &Actor) -> anyhow::Result<()> {
    match cmd {
        LaudoCommands::Create {
            cliente,
            equipamento,
            diagnostico,
            solucao,
        } => create(ctx, actor, cliente, equipamento, diagnostico, solucao),
        LaudoCommands::List { status, pending } => list(ctx, actor, status.as_deref(), *pending),
        LaudoCommands::Show { id } => show(ctx, actor, id),
        LaudoCommands::Save {
            id,
            diagnostico,
            solucao,
        } => save(ctx, actor, id, diagnostico.as_deref(), solucao.as_deref()),
        LaudoCommands::History { id } => history(ctx, actor, id),
        LaudoCommands::Stats => stats(ctx),
        LaudoCommands::Tags { limit } => tags(ctx, *limit),
    }
}

fn create(
    ctx: &Context,
    actor: &Actor,
    cliente: &str,
    equipamento: &str,
    diagnostico: &str,
    solucao: &str,
) -> anyhow::Result<()> {
    let mut coordinator = ctx.coordinator()?;
    let laudo = coordinator
        .create(actor, cliente, equipamento, diagnostico, solucao)
        .map_err(engine_failure)?;

    println!("Laudo created: {}", laudo.id);
    println!("  Cliente:     {}", laudo.cliente);
    println!("  Equipamento: {}", laudo.equipamento);
    println!("  Status:      {}", laudo.status);
    Ok(())
}

fn list(ctx: &Context, actor: &Actor, status: Option<&str>, pending: bool) -> anyhow::Result<()> {
    let store = ctx.store()?;
    let queries = QueryProjector::new(&store);

    let mut laudos = if pending {
        queries.pending_for(actor).map_err(engine_failure)?
    } else {
        queries.visible_to(actor).map_err(engine_failure)?
    };
    if let Some(filter) = status {
        let wanted: LaudoStatus = filter.parse()?;
        laudos.retain(|l| l.status == wanted);
    }

    if laudos.is_empty() {
        println!("No laudos found.");
        return Ok(());
    }

    println!(
        "{:<38} {:<20} {:<24} {:<20} {:>3}",
        "ID", "CLIENTE", "EQUIPAMENTO", "STATUS", "VER"
    );
    println!("{}", "-".repeat(108));
    for l in &laudos {
        println!(
            "{:<38} {:<20} {:<24} {:<20} {:>3}",
            l.id,
            truncate(&l.cliente, 18),
            truncate(&l.equipamento, 22),
            l.status.to_string(),
            l.version,
        );
    }
    println!("\n{} laudo(s) total.", laudos.len());
    Ok(())
}

fn show(ctx: &Context, actor: &Actor, id: &str) -> anyhow::Result<()> {
    let laudo = load_visible(ctx, actor, id)?;
    print_laudo(&laudo);
    Ok(())
}

fn save(
    ctx: &Context,
    actor: &Actor,
    id: &str,
    diagnostico: Option<&str>,
    solucao: Option<&str>,
) -> anyhow::Result<()> {
    let laudo_id = parse_laudo_id(id)?;
    let mut coordinator = ctx.coordinator()?;
    let laudo = coordinator
        .save_draft(laudo_id, actor, diagnostico, solucao)
        .map_err(engine_failure)?;
    println!("Draft saved: {} (version {})", laudo.id, laudo.version);
    Ok(())
}

fn history(ctx: &Context, actor: &Actor, id: &str) -> anyhow::Result<()> {
    let laudo = load_visible(ctx, actor, id)?;
    let coordinator = ctx.coordinator()?;
    let entries = coordinator.history(laudo.id).map_err(engine_failure)?;

    if entries.is_empty() {
        println!("No transitions recorded for {}.", id);
        return Ok(());
    }
    for e in &entries {
        let reason = e
            .reason
            .as_deref()
            .map(|r| format!("  ({})", r))
            .unwrap_or_default();
        println!(
            "{}  {} → {}  v{}{}",
            e.timestamp.to_rfc3339(),
            e.from_status,
            e.to_status,
            e.version,
            reason,
        );
    }
    Ok(())
}

fn stats(ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.store()?;
    let stats = QueryProjector::new(&store).stats().map_err(engine_failure)?;

    println!("em_andamento:        {}", stats.em_andamento);
    println!("aprovado_manutencao: {}", stats.aprovado_manutencao);
    println!("aprovado_vendas:     {}", stats.aprovado_vendas);
    println!("finalizado:          {}", stats.finalizado);
    println!("reprovado:           {}", stats.reprovado);
    println!("total:               {}", stats.total);
    println!("resubmissions:       {}", stats.resubmissions);
    Ok(())
}

/// Load a laudo for read-only display, applying the ownership/role
/// visibility rule. Records the actor may not see are reported as missing,
/// not as forbidden.
fn load_visible(ctx: &Context, actor: &Actor, id: &str) -> anyhow::Result<Laudo> {
    let laudo_id = parse_laudo_id(id)?;
    let store = ctx.store()?;
    match store.get(laudo_id).map_err(engine_failure)? {
        Some(l) if l.visible_to(actor) => Ok(l),
        _ => anyhow::bail!("laudo not found: {}", id),
    }
}

fn tags(ctx: &Context, limit: usize) -> anyhow::Result<()> {
    let store = ctx.store()?;
    let laudos = QueryProjector::new(&store)
        .recent_tags(limit)
        .map_err(engine_failure)?;

    if laudos.is_empty() {
        println!("No tagged laudos.");
        return Ok(());
    }
    for l in &laudos {
        if let Some(ref tag) = l.tag {
            println!(
                "{}  {}  {} (por {})",
                tag.updated_at.to_rfc3339(),
                l.id,
                tag.tag,
                tag.updated_by,
            );
        }
    }
    Ok(())
}

fn print_laudo(l: &Laudo) {
    println!("Laudo:       {}", l.id);
    println!("Cliente:     {}", l.cliente);
    println!("Equipamento: {}", l.equipamento);
    println!("Status:      {}", l.status);
    println!("Version:     {}", l.version);
    println!("Diagnóstico: {}", l.diagnostico);
    println!("Solução:     {}", l.solucao);
    if let Some(ref reason) = l.rejection_reason {
        println!("Reprovado:   {}", reason);
    }
    if l.resubmission_count > 0 {
        println!("Reenvios:    {}", l.resubmission_count);
    }
    if let Some(ref tag) = l.tag {
        println!(
            "Tag:         {} (por {} em {})",
            tag.tag,
            tag.updated_by,
            tag.updated_at.to_rfc3339()
        );
        if let Some(ref desc) = tag.description {
            println!("             {}", desc);
        }
    }
    println!("Criado:      {}", l.created_at.to_rfc3339());
    println!("Atualizado:  {}", l.updated_at.to_rfc3339());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max - 3).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}
