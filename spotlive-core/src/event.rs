//! Event listing types.
//!
//! `Event` is a row of the `events` collection as the backend returns it.
//! `EventRecord` is what we send back on insert/update: it has no `id` or
//! `created_at`, so those can never change through a write.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Categories offered by the creation form. The filter never uses this list;
/// it derives its categories from whatever is loaded.
pub const SUGGESTED_CATEGORIES: [&str; 8] = [
    "Rock",
    "Jazz",
    "Electronic",
    "Pop",
    "Hip-Hop",
    "Classical",
    "Folk",
    "Other",
];

/// Identifier assigned by the backend when a record is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        EventId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of an authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A live-music event listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub venue: String,
    /// Event day as entered, `YYYY-MM-DD` by convention
    #[serde(default, deserialize_with = "null_as_empty")]
    pub date: String,
    /// Start time as entered, `HH:MM` by convention
    #[serde(default, deserialize_with = "null_as_empty")]
    pub time: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub detailed_about: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub organizer: Option<String>,

    /// Public URL of the event image, empty when there is none
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_url: String,

    /// Owning account; `None` means nobody may edit or delete it
    #[serde(default)]
    pub user_id: Option<UserId>,

    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Whether `identity` owns this event. Both sides must be present.
    pub fn is_owned_by(&self, identity: Option<&UserId>) -> bool {
        match (identity, &self.user_id) {
            (Some(session), Some(owner)) => session == owner,
            _ => false,
        }
    }

    /// Write payload carrying the current values of this event.
    pub fn to_record(&self) -> EventRecord {
        EventRecord {
            name: self.name.clone(),
            description: self.description.clone(),
            detailed_about: self.detailed_about.clone(),
            location: self.location.clone(),
            venue: self.venue.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            category: self.category.clone(),
            organizer: self.organizer.clone(),
            image_url: self.image_url.clone(),
            user_id: self.user_id.clone(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Fields written on insert and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub name: String,
    pub description: String,
    pub detailed_about: Option<String>,
    pub location: String,
    pub venue: String,
    pub date: String,
    pub time: String,
    pub category: String,
    pub organizer: Option<String>,
    pub image_url: String,
    pub user_id: Option<UserId>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Optional text left blank by an older client reads as absent.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}
