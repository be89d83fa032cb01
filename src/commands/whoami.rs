use anyhow::Result;
use owo_colors::OwoColorize;

use crate::client;

pub async fn run() -> Result<()> {
    let app = client::open().await?;

    match app.session().user() {
        Some(user) => {
            let email = user.email.as_deref().unwrap_or("(no email)");
            println!("{} {}", email.bold(), user.id.as_str().dimmed());
        }
        None => println!("{}", "Not signed in".dimmed()),
    }

    Ok(())
}
