//! Seam between the workflows and the remote backend.
//!
//! The backend offers three capability groups, one trait each. Workflows
//! are generic over the traits they need, so tests run them against
//! the in-memory `TestGateway` and the binary against `SupabaseClient`.

pub mod supabase;
#[cfg(test)]
pub mod test;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayResult;
use crate::event::{Event, EventId, EventRecord, UserId};

pub use supabase::SupabaseClient;

/// The account behind an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

/// Parameters of a sign-up call.
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    /// Stored by the auth service as user metadata
    pub display_name: String,
}

/// A binary object waiting to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name, used to build the object name
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        ImageUpload {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read a local file into an upload.
    pub fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

/// Guess an image content type from the file extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

/// Sign-up, sign-in and session lookup.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Register an account. Returns the user when the service signs it in
    /// right away (no e-mail confirmation pending).
    async fn sign_up(&self, request: &SignUpRequest) -> GatewayResult<Option<AuthUser>>;

    async fn sign_in(&self, email: &str, password: &str) -> GatewayResult<AuthUser>;

    /// The currently authenticated user, if any.
    async fn current_user(&self) -> GatewayResult<Option<AuthUser>>;

    async fn sign_out(&self) -> GatewayResult<()>;
}

/// Operations on the `events` collection.
#[async_trait]
pub trait RecordGateway: Send + Sync {
    /// Every event, oldest `created_at` first.
    async fn list_events(&self) -> GatewayResult<Vec<Event>>;

    async fn insert_event(&self, record: &EventRecord) -> GatewayResult<()>;

    async fn update_event(&self, id: &EventId, record: &EventRecord) -> GatewayResult<()>;

    async fn delete_event(&self, id: &EventId) -> GatewayResult<()>;
}

/// Binary object storage.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `upload` under `name` in the image bucket.
    async fn upload_image(&self, name: &str, upload: &ImageUpload) -> GatewayResult<()>;

    /// Public URL of a previously uploaded object.
    fn public_image_url(&self, name: &str) -> String;
}

/// Everything the application needs from the backend.
pub trait Gateway: AuthGateway + RecordGateway + ObjectStorage {}

impl<T> Gateway for T where T: AuthGateway + RecordGateway + ObjectStorage {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_from_extension() {
        assert_eq!(content_type_for("poster.PNG"), "image/png");
        assert_eq!(content_type_for("band photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("archive.tar.gz"), "application/octet-stream");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }

    #[test]
    fn upload_from_path_keeps_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flyer.webp");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let upload = ImageUpload::from_path(&path).unwrap();
        assert_eq!(upload.file_name, "flyer.webp");
        assert_eq!(upload.content_type, "image/webp");
        assert_eq!(upload.bytes, vec![1, 2, 3]);
    }
}
