//! Draft commands: save, list, resume, delete, push

use super::{spinner, AppContext};
use crate::drafts::{RemoteStatus, SyncOutcome};
use crate::form::FormAction;
use crate::models::DraftSummary;
use crate::Result;
use clap::Subcommand;
use colored::Colorize;

#[derive(Subcommand)]
pub enum DraftCommands {
    /// Save the working form as a draft (same id on resave)
    Save {
        /// Do not mirror to the spreadsheet
        #[arg(long)]
        local: bool,
    },

    /// List saved drafts
    List {
        /// Also list drafts stored in the spreadsheet
        #[arg(short, long)]
        remote: bool,
    },

    /// Load a draft into the working form
    Resume {
        /// Draft ID
        id: String,
    },

    /// Delete a draft locally and remotely
    Delete {
        /// Draft ID
        id: String,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Mirror all local drafts to the spreadsheet
    Push,
}

pub async fn run(ctx: &AppContext, cmd: DraftCommands) -> Result<()> {
    match cmd {
        DraftCommands::Save { local } => save(ctx, local).await,
        DraftCommands::List { remote } => list(ctx, remote).await,
        DraftCommands::Resume { id } => resume(ctx, &id).await,
        DraftCommands::Delete { id, yes } => delete(ctx, &id, yes).await,
        DraftCommands::Push => push(ctx).await,
    }
}

fn report_remote(outcome: &SyncOutcome) {
    match &outcome.remote {
        RemoteStatus::Synced => println!("   {}", "remote copy updated".bright_black()),
        RemoteStatus::Disabled => {}
        RemoteStatus::Failed(_) => {
            if let Some(warning) = outcome.warning() {
                println!("{}", format!("⚠ {}", warning).yellow());
            }
        }
    }
}

async fn save(ctx: &AppContext, local_only: bool) -> Result<()> {
    let sync = ctx.synchronizer(local_only)?;
    let mut session = ctx.session()?;

    let pb = sync.has_remote().then(|| spinner("Saving draft..."));
    let outcome = sync.save(session.state()).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let outcome = outcome?;

    session.dispatch(FormAction::AssignId(outcome.id.clone()));
    session.save_if_dirty()?;

    println!("{}", format!("✓ Draft saved: {}", outcome.id).green());
    report_remote(&outcome);
    Ok(())
}

fn print_table(rows: &[DraftSummary]) {
    println!(
        "   {:<16} {:<26} {:<20} {:<14} {:<14} {:>5}",
        "ID", "Saved", "Name", "Area", "Supervisor", "% Ini"
    );
    for row in rows {
        println!(
            "   {:<16} {:<26} {:<20} {:<14} {:<14} {:>4}%",
            row.id, row.saved_at, row.name, row.area, row.supervisor, row.initial_pct
        );
    }
}

async fn list(ctx: &AppContext, remote: bool) -> Result<()> {
    let sync = ctx.synchronizer(!remote)?;

    println!("\n{}", "Pending cases (local):".green().bold());
    let local = sync.list().await?;
    if local.is_empty() {
        println!("   {}", "No pending drafts.".yellow());
    } else {
        print_table(&local);
    }

    if remote {
        println!("\n{}", "Pending cases (spreadsheet):".green().bold());
        let pb = spinner("Loading remote drafts...");
        let result = sync.list_remote().await;
        pb.finish_and_clear();

        match result {
            Ok(Some(rows)) if rows.is_empty() => {
                println!("   {}", "No pending drafts in the spreadsheet.".yellow())
            }
            Ok(Some(rows)) => print_table(&rows),
            Ok(None) => println!("   {}", "Remote drafts are disabled in config.".yellow()),
            Err(e) => println!("{}", format!("⚠ Could not load remote drafts: {}", e).yellow()),
        }
    }

    Ok(())
}

async fn resume(ctx: &AppContext, id: &str) -> Result<()> {
    let sync = ctx.synchronizer(false)?;

    let draft = match sync.resume(id).await {
        Ok(Some(draft)) => draft,
        Ok(None) => anyhow::bail!("Draft '{}' not found", id),
        Err(e) => anyhow::bail!("Could not download draft '{}': {}", id, e),
    };

    let mut session = ctx.session()?;
    session.dispatch(FormAction::Load {
        id: draft.id.clone(),
        record: draft.record,
    });
    session.save()?;

    println!("{}", format!("✓ Resuming case {}", draft.id).green());
    Ok(())
}

async fn delete(ctx: &AppContext, id: &str, yes: bool) -> Result<()> {
    if !yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!("Delete draft {}?", id))
            .default(false)
            .interact()?;
        if !confirmed {
            return Ok(());
        }
    }

    let sync = ctx.synchronizer(false)?;
    let outcome = sync.delete(id).await?;

    println!("{}", format!("✓ Draft {} deleted", id).green());
    report_remote(&outcome);
    Ok(())
}

async fn push(ctx: &AppContext) -> Result<()> {
    let sync = ctx.synchronizer(false)?;
    if !sync.has_remote() {
        println!("{}", "Remote drafts are disabled in config.".yellow());
        return Ok(());
    }

    let pb = spinner("Pushing drafts...");
    let outcomes = sync.push().await;
    pb.finish_and_clear();

    if outcomes.is_empty() {
        println!("{}", "No local drafts to push.".yellow());
    }
    for outcome in &outcomes {
        match &outcome.remote {
            RemoteStatus::Failed(reason) => {
                println!("   {} {} ({})", "✗".red(), outcome.id, reason)
            }
            _ => println!("   {} {}", "✓".green(), outcome.id),
        }
    }
    Ok(())
}
