use anyhow::Result;
use owo_colors::OwoColorize;
use spotlive_core::store::filter_by_category;

use crate::client;

pub async fn run() -> Result<()> {
    let app = client::start().await?;
    let store = app.store();

    let categories = store.categories();
    if categories.is_empty() {
        println!("{}", "No events yet".dimmed());
        return Ok(());
    }

    for category in categories {
        let count = filter_by_category(store.events(), Some(category)).len();
        println!("{} {}", category, format!("({count})").dimmed());
    }

    Ok(())
}
