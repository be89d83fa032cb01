use anyhow::Result;
use owo_colors::OwoColorize;
use spotlive_core::error::WorkflowError;
use spotlive_core::event::EventId;
use spotlive_core::form::SAVE_FAILED;

use super::fields::{self, EventArgs};
use crate::client;
use crate::utils::tui;

pub async fn run(id: &str, args: EventArgs) -> Result<()> {
    let mut app = client::start().await?;
    let panel = app
        .open_detail(&EventId::new(id))
        .ok_or_else(|| anyhow::anyhow!("Event '{}' not found", id))?;

    let mut form = panel
        .edit()
        .map_err(|e| anyhow::anyhow!(e.notice(SAVE_FAILED)))?;
    fields::fill(&mut form, args)?;

    let token = form.cancellation_token();
    let interrupt = tui::on_interrupt(move || token.cancel());

    let spinner = tui::create_spinner("Saving event".to_string());
    let result = app.submit_form(&form).await;
    spinner.finish_and_clear();
    interrupt.abort();

    match result {
        Err(WorkflowError::Cancelled) => {
            println!("{}", "Cancelled, nothing saved".dimmed());
            return Ok(());
        }
        other => other.map_err(|e| anyhow::anyhow!(e.notice(SAVE_FAILED)))?,
    }

    println!("{}", format!("  Updated: {}", form.fields.name).green());
    Ok(())
}
