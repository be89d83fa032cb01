use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dialoguer::Select;
use spotlive_core::event::SUGGESTED_CATEGORIES;
use spotlive_core::form::EventForm;
use spotlive_core::gateway::ImageUpload;

use crate::render::Render;
use crate::utils::tui;

const CUSTOM_CATEGORY: &str = "Something else...";

/// Event fields shared by `create` and `edit`.
#[derive(Args, Debug, Default)]
pub struct EventArgs {
    /// Event name
    #[arg(long)]
    pub name: Option<String>,

    /// Short description shown on the event card
    #[arg(long)]
    pub description: Option<String>,

    /// Longer text shown on the detail view
    #[arg(long)]
    pub about: Option<String>,

    /// City or area
    #[arg(short, long)]
    pub location: Option<String>,

    #[arg(long)]
    pub venue: Option<String>,

    /// Event day (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Start time (HH:MM)
    #[arg(short, long)]
    pub time: Option<String>,

    /// Genre, e.g. "Jazz"
    #[arg(short, long)]
    pub category: Option<String>,

    #[arg(long)]
    pub organizer: Option<String>,

    /// Image file to upload
    #[arg(long, conflicts_with = "no_image")]
    pub image: Option<PathBuf>,

    /// Remove the current image
    #[arg(long)]
    pub no_image: bool,
}

impl EventArgs {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.about.is_none()
            && self.location.is_none()
            && self.venue.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.category.is_none()
            && self.organizer.is_none()
            && self.image.is_none()
            && !self.no_image
    }
}

/// Copy the given flags into `form`. With no flags at all every field is
/// prompted for; otherwise only blank required fields are.
pub fn fill(form: &mut EventForm, args: EventArgs) -> Result<()> {
    let interactive = args.is_empty();
    let fields = &mut form.fields;

    set(&mut fields.name, args.name, "Name", interactive, false)?;
    set(&mut fields.description, args.description, "Description", interactive, false)?;
    set(&mut fields.detailed_about, args.about, "About (optional)", interactive, true)?;

    match args.category {
        Some(category) => fields.category = category,
        None if interactive || fields.category.trim().is_empty() => {
            fields.category = prompt_category(&fields.category)?;
        }
        None => {}
    }

    set(&mut fields.date, args.date, "Date (YYYY-MM-DD)", interactive, false)?;
    set(&mut fields.time, args.time, "Time (HH:MM)", interactive, false)?;
    set(&mut fields.venue, args.venue, "Venue", interactive, false)?;
    set(&mut fields.location, args.location, "Location", interactive, false)?;
    set(&mut fields.organizer, args.organizer, "Organizer (optional)", interactive, true)?;

    if args.no_image {
        form.clear_image();
    } else if let Some(path) = args.image {
        let upload = ImageUpload::from_path(&path)
            .with_context(|| format!("Failed to read image {}", path.display()))?;
        form.choose_image(upload);
        println!("  Image: {}", form.preview().render());
    }

    Ok(())
}

fn set(
    field: &mut String,
    value: Option<String>,
    label: &str,
    interactive: bool,
    optional: bool,
) -> Result<()> {
    match value {
        Some(value) => *field = value,
        None if interactive || (!optional && field.trim().is_empty()) => {
            *field = tui::prompt_text(label, field, optional)?;
        }
        None => {}
    }
    Ok(())
}

fn prompt_category(current: &str) -> Result<String> {
    let mut items: Vec<&str> = SUGGESTED_CATEGORIES.to_vec();
    items.push(CUSTOM_CATEGORY);

    let default = items.iter().position(|c| *c == current).unwrap_or(0);
    let selection = Select::new()
        .with_prompt("  Category")
        .items(&items)
        .default(default)
        .interact()?;

    if items[selection] == CUSTOM_CATEGORY {
        tui::prompt_text("Category", current, false)
    } else {
        Ok(items[selection].to_string())
    }
}
