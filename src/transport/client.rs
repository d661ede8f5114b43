//! HTTP transport
//!
//! Talks to the log server's two JSON endpoints: the history backlog and the
//! long-polled "next event" update.

use super::error::{TransportError, TransportResult};
use super::Transport;
use crate::transcript::Event;
use async_trait::async_trait;
use reqwest::Client;

/// HTTP transport for the log server
pub struct HttpTransport {
    client: Client,
    config: HttpTransportConfig,
}

/// Configuration for the HTTP transport
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Base URL of the log server (e.g., "http://localhost:8080")
    pub base_url: String,
    /// Path of the history endpoint
    pub history_path: String,
    /// Path of the update endpoint
    pub update_path: String,
    /// Request timeout in milliseconds; updates are long-polled so keep it generous
    pub request_timeout_ms: u64,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            history_path: "/history.js".to_string(),
            update_path: "/update.js".to_string(),
            request_timeout_ms: 60_000,
        }
    }
}

impl HttpTransport {
    /// Create a new transport with the given configuration
    pub fn new(config: HttpTransportConfig) -> TransportResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// GET a URL and return the body text of a successful response
    async fn get_text(&self, url: &str) -> TransportResult<String> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(TransportError::from_request)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response.text().await.map_err(TransportError::from_request)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_history(&self) -> TransportResult<Vec<Event>> {
        let body = self.get_text(&self.url(&self.config.history_path)).await?;
        decode_history(&body)
    }

    async fn fetch_next_event(&self) -> TransportResult<Option<Event>> {
        let body = self.get_text(&self.url(&self.config.update_path)).await?;
        decode_update(&body)
    }
}

/// Decode a history response: a JSON array of events
///
/// An empty body or `null` is an empty history.
pub fn decode_history(body: &str) -> TransportResult<Vec<Event>> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let history: Option<Vec<Event>> = serde_json::from_str(body)?;
    Ok(history.unwrap_or_default())
}

/// Decode an update response: a single event object
///
/// An empty body or `null` means no event arrived.
pub fn decode_update(body: &str) -> TransportResult<Option<Event>> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(None);
    }

    Ok(serde_json::from_str(body)?)
}
