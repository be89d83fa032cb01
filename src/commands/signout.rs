use anyhow::Result;
use owo_colors::OwoColorize;
use spotlive_core::auth;

use crate::client;

pub async fn run() -> Result<()> {
    let mut app = client::open().await?;

    if !app.session().is_authenticated() {
        println!("{}", "Not signed in".dimmed());
        return Ok(());
    }

    app.sign_out()
        .await
        .map_err(|e| anyhow::anyhow!(auth::notice(&e)))?;

    println!("{}", "  Signed out".green());
    Ok(())
}
