use anyhow::Result;
use owo_colors::OwoColorize;
use spotlive_core::auth::{self, SignInForm};

use crate::client;
use crate::utils::tui;

pub async fn run(email: Option<String>) -> Result<()> {
    let mut app = client::open().await?;

    let email = match email {
        Some(e) => e,
        None => tui::prompt_text("Email", "", false)?,
    };
    let mut form = SignInForm {
        email,
        password: tui::prompt_password("Password")?,
    };

    let spinner = tui::create_spinner("Signing in".to_string());
    let result = app.sign_in(&mut form).await;
    spinner.finish_and_clear();

    result.map_err(|e| anyhow::anyhow!(auth::notice(&e)))?;

    println!("{}", format!("  Signed in as {}", form.email).green());
    Ok(())
}
