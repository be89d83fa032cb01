//! Storage (`/storage/v1/object`) calls.

use async_trait::async_trait;

use super::{SupabaseClient, check};
use crate::error::GatewayResult;
use crate::gateway::{ImageUpload, ObjectStorage};

#[async_trait]
impl ObjectStorage for SupabaseClient {
    async fn upload_image(&self, name: &str, upload: &ImageUpload) -> GatewayResult<()> {
        let bucket = self.settings.image_bucket.as_str();
        let url = self.endpoint(&["storage", "v1", "object", bucket, name])?;

        let request = self
            .authorized(self.http.post(url))
            .await?
            .header(reqwest::header::CONTENT_TYPE, &upload.content_type)
            .header("x-upsert", "false")
            .body(upload.bytes.clone());

        check(request.send().await?).await?;

        tracing::debug!(name, bytes = upload.bytes.len(), "Uploaded image");
        Ok(())
    }

    fn public_image_url(&self, name: &str) -> String {
        let segments = [
            "storage",
            "v1",
            "object",
            "public",
            self.settings.image_bucket.as_str(),
            name,
        ];

        match self.endpoint(&segments) {
            Ok(url) => url.to_string(),
            // endpoint() only fails on a malformed base URL, and the upload
            // that precedes this call would already have failed on it.
            Err(_) => format!(
                "{}/{}",
                self.settings.url.trim_end_matches('/'),
                segments.join("/")
            ),
        }
    }
}
