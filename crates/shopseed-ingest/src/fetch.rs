//! Image downloads and filename inference.

use std::sync::LazyLock;
use std::time::Duration;

use percent_encoding::percent_decode_str;
use regex::Regex;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::Client;
use uuid::Uuid;

use crate::error::IngestError;
use crate::retry::retry_with_backoff;

/// Media type assumed when the server sends no `Content-Type`.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Extension used for generated filenames when the media subtype is unknown.
const FALLBACK_EXTENSION: &str = "jpg";

const KNOWN_EXTENSIONS: [&str; 6] = ["jpeg", "jpg", "png", "gif", "webp", "bmp"];

static DISPOSITION_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"filename="?([^";]+)"?"#).expect("valid content-disposition regex")
});

/// A successfully downloaded image, ready to be attached to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedImage {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Media type exactly as reported by the server (or the default).
    pub media_type: String,
}

impl DownloadedImage {
    /// The media type to declare on the multipart part.
    #[must_use]
    pub fn submission_media_type(&self) -> String {
        normalize_media_type(&self.media_type)
    }
}

/// Downloads images over HTTP with a fixed timeout and `User-Agent`.
pub struct ImageFetcher {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl ImageFetcher {
    /// Creates an `ImageFetcher`.
    ///
    /// `max_retries` applies to network failures only; non-2xx responses and
    /// empty bodies fail immediately.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, IngestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Downloads one image.
    ///
    /// # Errors
    ///
    /// - [`IngestError::Http`]: network failure or timeout.
    /// - [`IngestError::UnexpectedStatus`]: any non-2xx response.
    /// - [`IngestError::EmptyBody`]: a 2xx response with no content.
    pub async fn fetch(&self, url: &str) -> Result<DownloadedImage, IngestError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            self.fetch_once(url)
        })
        .await
    }

    async fn fetch_once(&self, url: &str) -> Result<DownloadedImage, IngestError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let media_type = header_value(&response, CONTENT_TYPE)
            .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_owned());
        let disposition = header_value(&response, CONTENT_DISPOSITION);

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(IngestError::EmptyBody {
                url: url.to_owned(),
            });
        }

        let filename = resolve_filename(disposition.as_deref(), url, &media_type);
        tracing::debug!(
            url,
            filename = %filename,
            media_type = %media_type,
            size = bytes.len(),
            "image downloaded"
        );
        Ok(DownloadedImage {
            filename,
            bytes: bytes.to_vec(),
            media_type,
        })
    }
}

fn header_value(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Picks a filename for a downloaded image.
///
/// In order of preference: the `filename` parameter of `Content-Disposition`
/// (percent-decoded), the last segment of the URL path when it carries a
/// 1-4 character extension, and finally a random UUID with an extension
/// derived from `media_type`.
#[must_use]
pub fn resolve_filename(content_disposition: Option<&str>, url: &str, media_type: &str) -> String {
    if let Some(name) = content_disposition.and_then(filename_from_disposition) {
        return name;
    }
    if let Some(name) = filename_from_url(url) {
        return name;
    }

    let name = format!("{}.{}", Uuid::new_v4(), extension_for(media_type));
    tracing::warn!(url, filename = %name, "could not infer image filename; generated one");
    name
}

fn filename_from_disposition(header: &str) -> Option<String> {
    let raw = DISPOSITION_FILENAME.captures(header)?.get(1)?.as_str();
    let decoded = percent_decode_str(raw).decode_utf8_lossy();
    let name = decoded.trim();
    (!name.is_empty()).then(|| name.to_owned())
}

fn filename_from_url(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let path = percent_decode_str(parsed.path()).decode_utf8_lossy();
    let basename = path.rsplit('/').next()?;
    let (_, extension) = basename.rsplit_once('.')?;
    (1..=4)
        .contains(&extension.chars().count())
        .then(|| basename.to_owned())
}

fn extension_for(media_type: &str) -> &'static str {
    let subtype = media_type
        .rsplit('/')
        .next()
        .and_then(|s| s.split(';').next())
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    KNOWN_EXTENSIONS
        .iter()
        .find(|known| **known == subtype)
        .copied()
        .unwrap_or(FALLBACK_EXTENSION)
}

/// Rewrites the non-standard `image/jpg` to `image/jpeg`; anything else is
/// returned unchanged.
#[must_use]
pub fn normalize_media_type(media_type: &str) -> String {
    if media_type.trim().eq_ignore_ascii_case("image/jpg") {
        "image/jpeg".to_owned()
    } else {
        media_type.to_owned()
    }
}

#[cfg(test)]
#[path = "fetch_test.rs"]
mod tests;
