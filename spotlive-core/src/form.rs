//! Create/edit form for a single event.

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use validator::{Validate, ValidationError as FieldError};

use crate::error::{ValidationError, WorkflowError, WorkflowResult};
use crate::event::{Event, EventId, EventRecord, UserId};
use crate::gateway::{Gateway, ImageUpload};
use crate::session::Session;

/// Notice shown when a submission fails remotely.
pub const SAVE_FAILED: &str = "Failed to save event";

/// Required fields, in the order violations are reported.
const REQUIRED: [&str; 7] = [
    "name",
    "description",
    "category",
    "location",
    "venue",
    "date",
    "time",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(EventId),
}

/// Field values as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct EventFields {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    pub detailed_about: String,
    #[validate(custom(function = "not_blank"))]
    pub location: String,
    #[validate(custom(function = "not_blank"))]
    pub venue: String,
    #[validate(custom(function = "not_blank"))]
    pub date: String,
    #[validate(custom(function = "not_blank"))]
    pub time: String,
    #[validate(custom(function = "not_blank"))]
    pub category: String,
    pub organizer: String,
}

fn not_blank(value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::new("blank"));
    }
    Ok(())
}

fn optional(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl EventFields {
    fn from_event(event: &Event) -> Self {
        EventFields {
            name: event.name.clone(),
            description: event.description.clone(),
            detailed_about: event.detailed_about.clone().unwrap_or_default(),
            location: event.location.clone(),
            venue: event.venue.clone(),
            date: event.date.clone(),
            time: event.time.clone(),
            category: event.category.clone(),
            organizer: event.organizer.clone().unwrap_or_default(),
        }
    }

    /// First missing required field, if any.
    pub fn check(&self) -> Result<(), ValidationError> {
        let Err(errors) = self.validate() else {
            return Ok(());
        };
        let invalid = errors.field_errors();

        match REQUIRED.iter().find(|field| invalid.contains_key(**field)) {
            Some(field) => Err(ValidationError::MissingField(*field)),
            None => Ok(()),
        }
    }

    fn to_record(&self, image_url: String, user_id: Option<UserId>) -> EventRecord {
        EventRecord {
            name: self.name.clone(),
            description: self.description.clone(),
            detailed_about: optional(&self.detailed_about),
            location: self.location.clone(),
            venue: self.venue.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            category: self.category.clone(),
            organizer: optional(&self.organizer),
            image_url,
            user_id,
        }
    }
}

/// What the form shows in its image slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePreview {
    None,
    /// The image already stored for the event.
    Remote(String),
    /// A file chosen locally, not uploaded yet.
    Local { file_name: String, size: usize },
}

/// Storage object name for an uploaded image.
pub fn object_name(file_name: &str, now: DateTime<Utc>) -> String {
    format!("event-{}-{}", now.timestamp_millis(), file_name)
}

pub struct EventForm {
    mode: FormMode,
    pub fields: EventFields,
    /// Owner of the event being edited
    owner: Option<UserId>,
    image_url: String,
    pending_image: Option<ImageUpload>,
    preview: ImagePreview,
    cancel: CancellationToken,
}

impl EventForm {
    pub fn create() -> Self {
        EventForm {
            mode: FormMode::Create,
            fields: EventFields::default(),
            owner: None,
            image_url: String::new(),
            pending_image: None,
            preview: ImagePreview::None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn edit(event: &Event) -> Self {
        let preview = if event.image_url.is_empty() {
            ImagePreview::None
        } else {
            ImagePreview::Remote(event.image_url.clone())
        };

        EventForm {
            mode: FormMode::Edit(event.id.clone()),
            fields: EventFields::from_event(event),
            owner: event.user_id.clone(),
            image_url: event.image_url.clone(),
            pending_image: None,
            preview,
            cancel: CancellationToken::new(),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn preview(&self) -> &ImagePreview {
        &self.preview
    }

    pub fn pending_image(&self) -> Option<&ImageUpload> {
        self.pending_image.as_ref()
    }

    /// Queue a file for upload. Nothing is sent until the form is submitted.
    pub fn choose_image(&mut self, upload: ImageUpload) {
        self.preview = ImagePreview::Local {
            file_name: upload.file_name.clone(),
            size: upload.bytes.len(),
        };
        self.pending_image = Some(upload);
    }

    /// Drop the queued file and the current image.
    pub fn clear_image(&mut self) {
        self.pending_image = None;
        self.image_url.clear();
        self.preview = ImagePreview::None;
    }

    /// Close the form. A submission still in flight resolves to
    /// `WorkflowError::Cancelled`.
    pub fn dismiss(&self) {
        self.cancel.cancel();
    }

    /// Token cancelled by `dismiss`, for callers that dismiss from
    /// another task.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Upload the pending image, if any, then insert or update the record.
    pub async fn submit<G>(&self, session: &Session, gateway: &G) -> WorkflowResult<()>
    where
        G: Gateway + ?Sized,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::debug!(mode = ?self.mode, "Form dismissed before submission resolved");
                Err(WorkflowError::Cancelled)
            }
            result = self.save(session, gateway) => result,
        }
    }

    async fn save<G>(&self, session: &Session, gateway: &G) -> WorkflowResult<()>
    where
        G: Gateway + ?Sized,
    {
        let identity = session.identity().ok_or(WorkflowError::SignInRequired)?;

        let user_id = match &self.mode {
            FormMode::Create => Some(identity.clone()),
            FormMode::Edit(_) => {
                if self.owner.as_ref() != Some(identity) {
                    return Err(WorkflowError::NotOwner);
                }
                self.owner.clone()
            }
        };

        self.fields.check()?;

        let result = self.write(gateway, user_id).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, mode = ?self.mode, "Error saving event");
        }
        result
    }

    async fn write<G>(&self, gateway: &G, user_id: Option<UserId>) -> WorkflowResult<()>
    where
        G: Gateway + ?Sized,
    {
        let image_url = match &self.pending_image {
            Some(upload) => {
                let name = object_name(&upload.file_name, Utc::now());
                gateway.upload_image(&name, upload).await?;
                gateway.public_image_url(&name)
            }
            None => self.image_url.clone(),
        };

        let record = self.fields.to_record(image_url, user_id);

        match &self.mode {
            FormMode::Create => gateway.insert_event(&record).await?,
            FormMode::Edit(id) => gateway.update_event(id, &record).await?,
        }

        Ok(())
    }
}
