//! Weather provider adapters
//!
//! Sources produce raw [`Observation`](wxmon_core::Observation)s in Kelvin;
//! unit policy is applied later by the monitor.

pub mod http;
pub mod openweather;
pub mod simulator;

pub use openweather::*;
pub use simulator::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Failed to fetch data after {attempts} attempt(s) due to: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<IngestError>,
    },
}

impl IngestError {
    /// Network-class failures are worth another attempt; HTTP statuses are not
    pub fn is_retryable(&self) -> bool {
        matches!(self, IngestError::Timeout | IngestError::Network(_))
    }
}

impl From<reqwest::Error> for IngestError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            IngestError::Timeout
        } else if e.is_connect() || e.is_request() {
            IngestError::Network(e.to_string())
        } else if e.is_decode() {
            IngestError::InvalidResponse(e.to_string())
        } else {
            IngestError::Network(e.to_string())
        }
    }
}

pub type IngestResult<T> = Result<T, IngestError>;
