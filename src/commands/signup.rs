use anyhow::Result;
use owo_colors::OwoColorize;
use spotlive_core::auth::{self, SignUpForm};

use crate::client;
use crate::utils::tui;

pub async fn run(name: Option<String>, email: Option<String>) -> Result<()> {
    let mut app = client::open().await?;

    let name = match name {
        Some(n) => n,
        None => tui::prompt_text("Full name", "", false)?,
    };
    let email = match email {
        Some(e) => e,
        None => tui::prompt_text("Email", "", false)?,
    };

    let mut form = SignUpForm {
        name,
        email: email.clone(),
        password: tui::prompt_password("Password")?,
        confirm_password: tui::prompt_password("Confirm password")?,
    };

    let spinner = tui::create_spinner("Creating account".to_string());
    let result = app.sign_up(&mut form).await;
    spinner.finish_and_clear();

    result.map_err(|e| anyhow::anyhow!(auth::notice(&e)))?;

    if app.session().is_authenticated() {
        println!("{}", format!("  Signed up as {}", email).green());
    } else {
        println!("{}", "  Account created".green());
        println!("  Check {} for a confirmation link, then run `spotlive signin`", email);
    }

    Ok(())
}
