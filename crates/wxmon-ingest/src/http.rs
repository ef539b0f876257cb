//! JSON-over-HTTP fetching with a per-request timeout and bounded retries

use crate::{IngestError, IngestResult};
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Append `params` to `base` as an encoded query string
pub fn build_url_with_params(base: &str, params: &[(&str, &str)]) -> IngestResult<Url> {
    Ok(Url::parse_with_params(base, params)?)
}

/// GET client that retries network-class failures only
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, max_retries: u32) -> IngestResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            max_retries,
        })
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Fetch and decode a JSON document
    ///
    /// Timeouts and connection failures are retried up to `max_retries`
    /// times; a non-2xx status or an undecodable body fails immediately.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &Url) -> IngestResult<T> {
        let mut retries_left = self.max_retries;
        let mut attempts = 0;

        loop {
            attempts += 1;
            match self.get_once(url).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && retries_left > 0 => {
                    warn!(
                        error = %e,
                        "Request failed (network issue), retrying... ({} retries left)",
                        retries_left
                    );
                    retries_left -= 1;
                }
                Err(e) if e.is_retryable() => {
                    error!(error = %e, attempts, "Request failed, giving up");
                    return Err(IngestError::RetriesExhausted {
                        attempts,
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    error!(error = %e, "Request failed");
                    return Err(e);
                }
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &Url) -> IngestResult<T> {
        let response = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IngestError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        debug!("Received {} byte response", bytes.len());

        serde_json::from_slice(&bytes).map_err(|e| IngestError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_url_encodes_params() {
        let url = build_url_with_params(
            "https://api.example.com/data/2.5/weather",
            &[("q", "São Paulo"), ("APPID", "k&y")],
        )
        .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.example.com/data/2.5/weather?q=S%C3%A3o+Paulo&APPID=k%26y"
        );
    }

    #[test]
    fn test_build_url_rejects_garbage() {
        assert!(matches!(
            build_url_with_params("not a url", &[]),
            Err(IngestError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_json_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hello": "world"})))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(DEFAULT_TIMEOUT, DEFAULT_MAX_RETRIES).unwrap();
        let url = Url::parse(&format!("{}/ok", server.uri())).unwrap();
        let value: Value = fetcher.fetch_json(&url).await.unwrap();

        assert_eq!(value["hello"], "world");
    }

    #[tokio::test]
    async fn test_status_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("city not found"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(DEFAULT_TIMEOUT, DEFAULT_MAX_RETRIES).unwrap();
        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        let err = fetcher.fetch_json::<Value>(&url).await.unwrap_err();

        match err {
            IngestError::Status { status, body } => {
                assert_eq!(status.as_u16(), 404);
                assert_eq!(body, "city not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_retried_then_wrapped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .expect(3)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(Duration::from_millis(50), 2).unwrap();
        let url = Url::parse(&format!("{}/slow", server.uri())).unwrap();
        let err = fetcher.fetch_json::<Value>(&url).await.unwrap_err();

        match err {
            IngestError::RetriesExhausted { attempts, source } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*source, IngestError::Timeout));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(DEFAULT_TIMEOUT, DEFAULT_MAX_RETRIES).unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        let err = fetcher.fetch_json::<Value>(&url).await.unwrap_err();

        assert!(matches!(err, IngestError::InvalidResponse(_)));
    }
}
