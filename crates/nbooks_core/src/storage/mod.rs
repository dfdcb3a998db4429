//! Object storage
//!
//! Uploads cover images to a bucket-based object store over HTTP and derives their public URLs.
pub mod errors;

use crate::storage::errors::StorageError;
use chrono::NaiveDateTime;
use core::time::Duration;
use reqwest::{ClientBuilder, header};
use urlencoding::encode;

/// Bucket that holds the book covers unless configured otherwise
pub const DEFAULT_COVER_BUCKET: &str = "portadas_libros";

/// Where the object store lives.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Base URL of the upload endpoint, objects are posted to `{base_url}/{bucket}/{key}`
    pub base_url: String,
    /// Base URL objects are publicly served from
    pub public_base_url: String,
    /// Bearer token sent with uploads
    pub api_key: Option<String>,
}

impl StorageConfig {
    #[must_use]
    #[inline]
    pub fn new(base_url: &str, public_base_url: &str, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            public_base_url: public_base_url.trim_end_matches('/').to_owned(),
            api_key,
        }
    }
}

#[derive(Debug)]
pub struct ObjectStorage {
    /// A HTTP client used for all uploads
    http_client: reqwest::Client,
    config: StorageConfig,
}

impl ObjectStorage {
    /// Create a new storage client, to be shared by all subsequent uploads
    /// # Errors
    /// Fails if the API key is not a valid header value or the HTTP client cannot be built
    #[allow(
        clippy::missing_inline_in_public_items,
        reason = "Called once per program run"
    )]
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        let mut headers = header::HeaderMap::new();
        if let Some(key) = &config.api_key {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|_err| StorageError::InvalidApiKey)?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }
        let http_client = ClientBuilder::new()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .pool_max_idle_per_host(1)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Stores `bytes` under `bucket/key`. Nothing is retried.
    /// # Errors
    /// Returns an error if the request fails or the store answers with a non-success status
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn upload(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        let url = format!(
            "{}/{}/{}",
            self.config.base_url,
            encode(bucket),
            encode(key)
        );
        log::info!("Uploading {} bytes to {url}", bytes.len());

        let response = self
            .http_client
            .post(&url)
            .header(header::CONTENT_TYPE, content_type(key))
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(StorageError::Rejected {
            status: status.as_u16(),
            message: rejection_message(&body),
        })
    }

    /// Public URL of an object, `{public_base_url}/{bucket}/{key}`
    #[must_use]
    #[inline]
    pub fn public_url(&self, bucket: &str, key: &str) -> String {
        public_url(&self.config.public_base_url, bucket, key)
    }
}

/// Segments are percent-encoded the same way [`ObjectStorage::upload`] encodes them.
#[must_use]
#[inline]
pub fn public_url(public_base_url: &str, bucket: &str, key: &str) -> String {
    format!(
        "{}/{}/{}",
        public_base_url.trim_end_matches('/'),
        encode(bucket),
        encode(key)
    )
}

/// File extension of a cover image, from its leading bytes. Anything that is not a PNG is
/// stored as a JPEG.
#[must_use]
#[inline]
pub fn image_extension(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(PNG_SIGNATURE) {
        "png"
    } else {
        "jpg"
    }
}

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Storage key of a newly uploaded cover: the book name followed by the upload timestamp and
/// `extension`. Characters other than ASCII letters, digits, `.`, `-` and `_` become underscores.
#[must_use]
#[inline]
pub fn cover_key(book_name: &str, extension: &str, uploaded_at: NaiveDateTime) -> String {
    let name: String = book_name
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    format!("{name}_{}.{extension}", uploaded_at.format("%Y%m%d%H%M%S"))
}

fn content_type(key: &str) -> &'static str {
    let lowered = key.to_lowercase();
    if lowered.ends_with(".png") {
        "image/png"
    } else {
        "image/jpeg"
    }
}

/// Object stores usually answer with `{"message": ...}` or `{"error": ...}`, fall back to the raw
/// body otherwise.
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.trim().to_owned())
}
