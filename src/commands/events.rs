use anyhow::Result;
use owo_colors::OwoColorize;

use crate::client;
use crate::render::{EMPTY_CATEGORY, Render, render_categories};

pub async fn run(category: Option<String>) -> Result<()> {
    let mut app = client::start().await?;
    app.select_category(category);

    let store = app.store();
    let categories = store.categories();
    if !categories.is_empty() {
        println!("{}\n", render_categories(&categories, store.selected_category()));
    }

    let events = store.filtered();
    if events.is_empty() {
        if store.selected_category().is_some() {
            println!("{}", EMPTY_CATEGORY.dimmed());
        } else {
            println!("{}", "No events yet".dimmed());
        }
        return Ok(());
    }

    for event in events {
        println!("{}", event.render());
        println!("     {}\n", event.id.as_str().dimmed());
    }

    Ok(())
}
