//! Colored terminal rendering for SpotLive types.

use chrono::{NaiveDate, NaiveTime};
use owo_colors::OwoColorize;
use spotlive_core::detail::DetailPanel;
use spotlive_core::event::Event;
use spotlive_core::form::ImagePreview;

pub const EMPTY_CATEGORY: &str = "No events found in this genre. Try another category!";

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// Card used in the event list.
impl Render for Event {
    fn render(&self) -> String {
        format!(
            "{} {}  {} {}\n     {}\n     {} @ {}",
            format!("[{}]", self.category).magenta(),
            self.name.bold(),
            format_date(&self.date).dimmed(),
            format_time(&self.time).dimmed(),
            self.description,
            self.venue,
            self.location.dimmed(),
        )
    }
}

impl Render for DetailPanel {
    fn render(&self) -> String {
        let event = self.event();
        let mut lines = vec![
            format!("{}  {}", event.name.bold(), format!("[{}]", event.category).magenta()),
            event.description.clone(),
        ];

        if let Some(about) = non_blank(&event.detailed_about) {
            lines.push(String::new());
            lines.push("About".bold().to_string());
            lines.push(about.to_string());
        }

        lines.push(String::new());
        lines.push(format!("  Date      {}", format_date(&event.date)));
        lines.push(format!("  Time      {}", format_time(&event.time)));
        lines.push(format!("  Venue     {}", event.venue));
        lines.push(format!("  Location  {}", event.location));
        if let Some(organizer) = non_blank(&event.organizer) {
            lines.push(format!("  Organizer {}", organizer));
        }
        if !event.image_url.is_empty() {
            lines.push(format!("  Image     {}", event.image_url.dimmed()));
        }
        lines.push(format!("  Id        {}", event.id.as_str().dimmed()));

        if self.can_edit() {
            lines.push(String::new());
            lines.push(
                format!("You own this event: spotlive edit {0} | spotlive delete {0}", event.id)
                    .cyan()
                    .to_string(),
            );
        }

        lines.join("\n")
    }
}

impl Render for ImagePreview {
    fn render(&self) -> String {
        match self {
            ImagePreview::None => "no image".dimmed().to_string(),
            ImagePreview::Remote(url) => url.clone(),
            ImagePreview::Local { file_name, size } => {
                format!("{} ({} bytes, not uploaded yet)", file_name, size)
            }
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Category filter bar, with the selected entry highlighted.
pub fn render_categories(categories: &[&str], selected: Option<&str>) -> String {
    let all = if selected.is_none() {
        "All".green().bold().to_string()
    } else {
        "All".to_string()
    };

    let mut items = vec![all];
    for category in categories {
        if Some(*category) == selected {
            items.push(category.green().bold().to_string());
        } else {
            items.push(category.to_string());
        }
    }
    items.join("  ")
}

/// `2025-06-14` becomes `Sat, Jun 14, 2025`; anything else is shown as is.
pub fn format_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%a, %b %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// `20:00` (or `20:00:00`) becomes `8:00 PM`; anything else is shown as is.
pub fn format_time(time: &str) -> String {
    NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map(|t| t.format("%-I:%M %p").to_string())
        .unwrap_or_else(|_| time.to_string())
}
