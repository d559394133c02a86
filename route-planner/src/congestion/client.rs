//! HTTP congestion API client.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;

use super::error::CongestionError;
use super::provider::CongestionProvider;
use crate::domain::{CongestionLevel, LineId, StationId};

/// Default per-request timeout. Lookups happen inside route searches, so this
/// stays short.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Response body for a single lookup.
#[derive(Debug, Deserialize)]
struct LevelResponse {
    level: u8,
}

/// Configuration for the congestion API client.
#[derive(Debug, Clone)]
pub struct CongestionClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Optional API key sent as the x-apikey header
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl CongestionClientConfig {
    /// Create a new config with the given base URL and default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Blocking client for a congestion API.
///
/// Issues `GET {base}/congestion?station=..&line=..&hour=..` and expects
/// `{"level": 1..4}`.
#[derive(Debug, Clone)]
pub struct CongestionClient {
    http: Client,
    base_url: String,
}

impl CongestionClient {
    /// Create a new client.
    pub fn new(config: CongestionClientConfig) -> Result<Self, CongestionError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|_| CongestionError::Config("invalid API key format".to_string()))?;
            headers.insert(HeaderName::from_static("x-apikey"), value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self) -> String {
        format!("{}/congestion", self.base_url)
    }
}

impl CongestionProvider for CongestionClient {
    fn lookup(
        &self,
        station: &StationId,
        line: &LineId,
        hour: u8,
    ) -> Result<CongestionLevel, CongestionError> {
        let hour = (hour % 24).to_string();
        let response = self
            .http
            .get(self.url())
            .query(&[
                ("station", station.as_str()),
                ("line", line.as_str()),
                ("hour", hour.as_str()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CongestionError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text()?;
        parse_level(&body)
    }
}

fn parse_level(body: &str) -> Result<CongestionLevel, CongestionError> {
    let parsed: LevelResponse = serde_json::from_str(body).map_err(|e| CongestionError::Json {
        message: e.to_string(),
    })?;
    Ok(CongestionLevel::from_level(parsed.level)?)
}
