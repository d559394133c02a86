//! Congestion lookup error types.

use crate::domain::DomainError;

/// Errors that can occur when looking up congestion data.
///
/// These never reach route callers: the planner substitutes the neutral
/// level whenever a lookup fails.
#[derive(Debug, thiserror::Error)]
pub enum CongestionError {
    /// HTTP request failed (including timeouts)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Provider returned a level outside 1-4
    #[error("bad congestion level: {0}")]
    Level(#[from] DomainError),

    /// Provider has no data for the key
    #[error("no congestion data for {station} on line {line} at hour {hour}")]
    NoData {
        station: String,
        line: String,
        hour: u8,
    },

    /// Client could not be configured
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl CongestionError {
    /// Whether the failure points at the whole service being unavailable
    /// rather than at one missing key.
    pub fn is_outage(&self) -> bool {
        match self {
            CongestionError::Http(_) => true,
            CongestionError::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
