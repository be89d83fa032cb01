use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use spotlive_core::detail::{DELETE_FAILED, DELETE_PROMPT, DeleteOutcome};
use spotlive_core::error::WorkflowError;
use spotlive_core::event::EventId;

use crate::client;
use crate::utils::tui;

pub async fn run(id: &str, force: bool) -> Result<()> {
    let mut app = client::start().await?;
    let mut panel = app
        .open_detail(&EventId::new(id))
        .ok_or_else(|| anyhow::anyhow!("Event '{}' not found", id))?;

    if !panel.can_delete() {
        anyhow::bail!(WorkflowError::NotOwner.notice(DELETE_FAILED));
    }

    // Confirm unless --force
    let confirmed = force
        || Confirm::new()
            .with_prompt(format!("{} ({})", DELETE_PROMPT, panel.event().name))
            .default(false)
            .interact()?;

    let token = panel.cancellation_token();
    let interrupt = tui::on_interrupt(move || token.cancel());

    let spinner = tui::create_spinner("Deleting event".to_string());
    let result = app.delete_event(&mut panel, |_| confirmed).await;
    spinner.finish_and_clear();
    interrupt.abort();

    if let Err(WorkflowError::Cancelled) = result {
        println!("{}", "Cancelled".dimmed());
        return Ok(());
    }

    match result.map_err(|e| anyhow::anyhow!(e.notice(DELETE_FAILED)))? {
        DeleteOutcome::Declined => println!("{}", "Nothing deleted".dimmed()),
        DeleteOutcome::Deleted(_) => {
            println!("{}", format!("  Deleted: {}", panel.event().name).green())
        }
    }

    Ok(())
}
