//! Working form commands: items, new, set, mark, show

use super::AppContext;
use crate::form::{FormAction, FormState};
use crate::models::{Catalog, Choice, MetadataField, Phase};
use crate::Result;
use colored::Colorize;

/// Print the evaluation catalog
pub fn items(ctx: &AppContext) -> Result<()> {
    println!("{}", "Evaluation items / 评估项目".cyan().bold());
    for (i, item) in ctx.catalog.items().iter().enumerate() {
        println!("  {:>2}. {}", i + 1, item.es);
        println!("      {}", item.zh.bright_black());
    }
    Ok(())
}

/// Start a blank form, discarding the current one
pub fn new(ctx: &AppContext, yes: bool) -> Result<()> {
    let mut session = ctx.session()?;

    if !yes && session.state() != &FormState::new(ctx.catalog.len()) {
        let discard = dialoguer::Confirm::new()
            .with_prompt("Discard the current form? (saved drafts are kept)")
            .default(false)
            .interact()?;
        if !discard {
            println!("Keeping the current form");
            return Ok(());
        }
    }

    session.dispatch(FormAction::Reset);
    session.save()?;
    println!("{}", "✓ Started a new form".green());
    Ok(())
}

/// Set one header field
pub fn set(ctx: &AppContext, field: MetadataField, value: String) -> Result<()> {
    let mut session = ctx.session()?;
    session.dispatch(FormAction::SetField(field, value));
    session.save_if_dirty()?;

    println!(
        "{}",
        format!("✓ {} = {}", field, session.state().record.employee.get(field)).green()
    );
    Ok(())
}

/// Answer one row (1-based) in one phase
pub fn mark(ctx: &AppContext, row: usize, phase: Phase, choice: Choice) -> Result<()> {
    if row == 0 || row > ctx.catalog.len() {
        anyhow::bail!(
            "Row {} does not exist (the form has {} items)",
            row,
            ctx.catalog.len()
        );
    }

    let mut session = ctx.session()?;
    let state = session.dispatch(FormAction::Select {
        row: row - 1,
        phase,
        choice,
    });
    let pct = state.record.compliance_pct(phase);
    session.save_if_dirty()?;

    println!(
        "{}",
        format!("✓ Row {} {} = {} ({} compliance {}%)", row, phase, choice, phase, pct).green()
    );
    Ok(())
}

/// Show the working form
pub fn show(ctx: &AppContext, json: bool) -> Result<()> {
    let session = ctx.session()?;
    let state = session.state();

    if json {
        println!("{}", serde_json::to_string_pretty(state)?);
        return Ok(());
    }

    print!("{}", render(state, &ctx.catalog));
    Ok(())
}

fn choice_cell(choice: Choice) -> String {
    match choice {
        Choice::Yes => "YES".green().to_string(),
        Choice::No => "NO".red().to_string(),
        Choice::Unset => "-".bright_black().to_string(),
    }
}

/// Text rendering of a form
pub fn render(state: &FormState, catalog: &Catalog) -> String {
    let mut out = String::new();
    let id = state.id.as_deref().unwrap_or("(not saved)");
    out.push_str(&format!("{}\n", format!("SOC V3 · {}", id).cyan().bold()));
    out.push('\n');

    for field in MetadataField::ALL {
        out.push_str(&format!(
            "   {:<11} {}\n",
            format!("{}:", field),
            state.record.employee.get(field)
        ));
    }

    out.push('\n');
    out.push_str(&format!("   {:>3}  {:<8} {:<8} {}\n", "#", "Initial", "Final", "Item"));
    for (i, row) in state.rows().iter().enumerate() {
        let text = catalog
            .get(i)
            .map(|item| item.es.clone())
            .unwrap_or_default();
        out.push_str(&format!(
            "   {:>3}  {:<8} {:<8} {}\n",
            i + 1,
            choice_cell(row.initial),
            choice_cell(row.final_),
            text
        ));
    }

    out.push('\n');
    out.push_str(&format!(
        "   Initial compliance: {}%\n   Final compliance:   {}%\n",
        state.initial_compliance_pct(),
        state.final_compliance_pct()
    ));
    out
}
