use anyhow::{Context, Result};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};

pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["-", "\\", "|", "/"])
        .template("{msg} {spinner}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// Run `f` once if Ctrl-C arrives before the returned handle is aborted.
pub fn on_interrupt(f: impl FnOnce() + Send + 'static) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            f();
        }
    })
}

/// Prompt for a line of text. An empty answer is allowed when `optional`.
pub fn prompt_text(label: &str, initial: &str, optional: bool) -> Result<String> {
    let input = Input::<String>::new()
        .with_prompt(format!("  {label}"))
        .allow_empty(optional)
        .with_initial_text(initial)
        .interact_text()?;
    Ok(input)
}

/// Prompt for a password without echoing it.
pub fn prompt_password(label: &str) -> Result<String> {
    let prompt = format!("  {label}: ");
    rpassword::prompt_password(&prompt).context("Failed to read password")
}
