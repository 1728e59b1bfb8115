//! Watermelon Index snapshot client
//!
//! The Glide app serves its data in two steps: a POST to the snapshot endpoint
//! returns a short-lived `dataSnapshot` URL, and that URL serves the whole app
//! dataset as base64-encoded JSON.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error};

use crate::config::WatermelonConfig;

/// Browser origin of the Glide app; the snapshot endpoint checks it
const GLIDE_ORIGIN: &str = "https://watermelonindex.glide.page";

/// Maximum number of response characters echoed to the debug log
const LOG_PREVIEW_CHARS: usize = 500;

/// Errors that can occur when fetching the dataset
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed or returned an error status
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The snapshot endpoint answered with a non-success status
    #[error("Snapshot endpoint returned {0}")]
    UpstreamStatus(reqwest::StatusCode),

    /// The snapshot endpoint answered without a snapshot URL
    #[error("dataSnapshot URL not found in response")]
    MissingSnapshotUrl,

    /// The snapshot body is not valid base64
    #[error("Failed to decode snapshot: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    /// The decoded snapshot is not valid JSON
    #[error("Failed to parse snapshot JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The decoded snapshot does not have the expected layout
    #[error("Unexpected snapshot layout: {0}")]
    UnexpectedLayout(String),
}

/// Response of the snapshot endpoint
#[derive(Debug, Deserialize)]
struct SnapshotResponse {
    #[serde(rename = "dataSnapshot")]
    data_snapshot: Option<String>,
}

/// Client for the Watermelon Index snapshot API
#[derive(Debug, Clone)]
pub struct WatermelonClient {
    http_client: Client,
    config: WatermelonConfig,
}

impl WatermelonClient {
    /// Creates a client for the given upstream settings
    pub fn new(config: WatermelonConfig) -> Self {
        Self {
            http_client: Client::new(),
            config,
        }
    }

    /// Headers the Glide web client sends with the snapshot request
    fn snapshot_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("*/*"));
        headers.insert("accept-language", HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert("origin", HeaderValue::from_static(GLIDE_ORIGIN));
        headers.insert(
            "referer",
            HeaderValue::from_static("https://watermelonindex.glide.page/dl/companies"),
        );
        headers.insert("sec-fetch-dest", HeaderValue::from_static("empty"));
        headers.insert("sec-fetch-mode", HeaderValue::from_static("same-origin"));
        headers.insert("sec-fetch-site", HeaderValue::from_static("same-origin"));
        headers.insert(
            "user-agent",
            HeaderValue::from_static(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36",
            ),
        );
        headers.insert("x-glide-anonymous-user", HeaderValue::from_static(""));
        headers.insert("x-glide-attempt", HeaderValue::from_static("1"));
        if let Ok(request_id) = HeaderValue::from_str(&self.config.request_id) {
            headers.insert("fly-customer-request-id", request_id);
        }
        headers
    }

    /// Fetches and decodes the full snapshot
    ///
    /// # Returns
    /// * `Ok(Value)` - The decoded snapshot, a JSON object with a `data` key
    /// * `Err(FetchError)` - If either request fails or the payload cannot be decoded
    pub async fn fetch_raw_data(&self) -> Result<Value, FetchError> {
        let snapshot_url = self.fetch_snapshot_url().await?;
        debug!(url = %snapshot_url, "Fetching encoded snapshot");

        let response = self
            .http_client
            .get(&snapshot_url)
            .send()
            .await?
            .error_for_status()?;
        let encoded = response.text().await?;

        decode_snapshot(&encoded)
    }

    /// Asks the snapshot endpoint where the current snapshot lives
    async fn fetch_snapshot_url(&self) -> Result<String, FetchError> {
        let payload = json!({ "appID": self.config.app_id });
        debug!(url = %self.config.snapshot_url, payload = %payload, "Requesting snapshot URL");

        let response = self
            .http_client
            .post(&self.config.snapshot_url)
            .query(&[("reqid", self.config.request_id.as_str())])
            .headers(self.snapshot_headers())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(
            status = %status,
            body = %text.chars().take(LOG_PREVIEW_CHARS).collect::<String>(),
            "Snapshot endpoint responded"
        );

        if !status.is_success() {
            error!(status = %status, body = %text, "Snapshot request failed");
            return Err(FetchError::UpstreamStatus(status));
        }

        let snapshot: SnapshotResponse = serde_json::from_str(&text)?;
        snapshot
            .data_snapshot
            .filter(|url| !url.is_empty())
            .ok_or(FetchError::MissingSnapshotUrl)
    }
}

/// Decodes a base64 snapshot body into JSON
pub fn decode_snapshot(encoded: &str) -> Result<Value, FetchError> {
    let bytes = BASE64.decode(encoded.trim())?;
    let value = serde_json::from_slice(&bytes)?;
    Ok(value)
}
