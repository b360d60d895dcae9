//! Multipart client for the remote catalog's create-item endpoint.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::error::IngestError;
use crate::fetch::{DownloadedImage, DEFAULT_MEDIA_TYPE};
use crate::validate::ItemPayload;

/// Multipart field carrying the JSON item payload.
pub const ITEM_PART_NAME: &str = "item";
/// Multipart field repeated once per image.
pub const IMAGES_PART_NAME: &str = "images";

/// Status and body returned by the catalog for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    pub status: u16,
    pub body: String,
}

impl SubmitResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub struct CatalogClient {
    client: Client,
    endpoint: String,
}

impl CatalogClient {
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self, IngestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_owned(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submits one item with all of its downloaded images in a single
    /// multipart request. Any HTTP answer, including non-2xx, is `Ok`.
    ///
    /// # Errors
    ///
    /// - [`IngestError::Encode`]: the payload cannot be serialized.
    /// - [`IngestError::Http`]: network failure or timeout.
    pub async fn submit(
        &self,
        payload: &ItemPayload,
        images: Vec<DownloadedImage>,
    ) -> Result<SubmitResponse, IngestError> {
        let json = serde_json::to_string(payload)?;
        let mut form = Form::new().part(
            ITEM_PART_NAME,
            Part::text(json).mime_str("application/json")?,
        );
        for image in images {
            form = form.part(IMAGES_PART_NAME, image_part(image)?);
        }

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(status, error = %e, "failed to read catalog response body");
                String::new()
            }
        };
        Ok(SubmitResponse { status, body })
    }
}

fn image_part(image: DownloadedImage) -> Result<Part, IngestError> {
    let mut media_type = image.submission_media_type();
    if !is_valid_media_type(&media_type) {
        tracing::warn!(
            filename = %image.filename,
            media_type = %media_type,
            fallback = DEFAULT_MEDIA_TYPE,
            "unparseable image media type; using fallback"
        );
        media_type = DEFAULT_MEDIA_TYPE.to_owned();
    }
    Ok(Part::bytes(image.bytes)
        .file_name(image.filename)
        .mime_str(&media_type)?)
}

fn is_valid_media_type(media_type: &str) -> bool {
    Part::text("").mime_str(media_type).is_ok()
}
