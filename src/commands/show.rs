use anyhow::Result;
use spotlive_core::event::EventId;

use crate::client;
use crate::render::Render;

pub async fn run(id: &str, open_image: bool) -> Result<()> {
    let app = client::start().await?;
    let panel = app
        .open_detail(&EventId::new(id))
        .ok_or_else(|| anyhow::anyhow!("Event '{}' not found", id))?;

    println!("{}", panel.render());

    if open_image {
        let url = &panel.event().image_url;
        if url.is_empty() {
            println!("\nThis event has no image");
        } else if open::that(url).is_err() {
            println!("\n(Could not open browser automatically, please copy the URL above)");
        }
    }

    Ok(())
}
