use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt::Debug;

use crate::model::WeatherResponse;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1/";

/// Raw outcome of one `current.json` call that reached the server.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub message: String,
    /// Only present for a success status with a non-empty body.
    pub body: Option<WeatherResponse>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failures (connect, DNS, timeout, malformed JSON) are
/// returned as `Err` and left for the caller to classify.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch(&self, api_key: &str, location: &str) -> Result<HttpResponse>;
}

#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    base_url: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), http: Client::new() }
    }

    fn current_url(&self) -> String {
        format!("{}/current.json", self.base_url.trim_end_matches('/'))
    }
}

impl Default for WeatherApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    error: WaError,
}

#[derive(Debug, Deserialize)]
struct WaError {
    message: String,
}

#[async_trait]
impl WeatherClient for WeatherApiClient {
    async fn fetch(&self, api_key: &str, location: &str) -> Result<HttpResponse> {
        let res = self
            .http
            .get(self.current_url())
            .query(&[("key", api_key), ("q", location)])
            .send()
            .await
            // The URL carries the API key in its query string.
            .map_err(reqwest::Error::without_url)
            .context("Failed to send request to WeatherAPI.com (current)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to read WeatherAPI current response body")?;

        if !status.is_success() {
            return Ok(HttpResponse {
                status: status.as_u16(),
                message: error_message(status, &body),
                body: None,
            });
        }

        let parsed: Option<WeatherResponse> = if body.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&body).context("Failed to parse WeatherAPI current JSON")?
        };

        debug!("WeatherAPI responded {status} for {location:?}");

        Ok(HttpResponse {
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or_default().to_string(),
            body: parsed,
        })
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<WaErrorBody>(body) {
        return parsed.error.message;
    }

    match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => truncate_body(body),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
