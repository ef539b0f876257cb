//! OpenWeatherMap current-conditions source

use crate::http::{build_url_with_params, HttpFetcher, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};
use crate::{IngestError, IngestResult};
use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use wxmon_core::{Observation, WeatherSource};

pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

/// OpenWeatherMap API response, reduced to the fields we read
#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    main: OwmMain,
    weather: Vec<OwmWeather>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    temp_max: f64,
    temp_min: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    main: String,
}

impl TryFrom<OwmCurrentResponse> for Observation {
    type Error = IngestError;

    fn try_from(data: OwmCurrentResponse) -> Result<Self, Self::Error> {
        let condition = data
            .weather
            .into_iter()
            .next()
            .map(|w| w.main)
            .ok_or_else(|| IngestError::InvalidResponse("missing weather[0].main".into()))?;

        Ok(Observation::new(
            data.main.temp,
            data.main.temp_max,
            data.main.temp_min,
            condition,
        ))
    }
}

/// Fetches current conditions (Kelvin) by city name
pub struct OpenWeatherSource {
    fetcher: HttpFetcher,
    endpoint: String,
    api_key: String,
}

impl OpenWeatherSource {
    pub fn new(api_key: impl Into<String>) -> IngestResult<Self> {
        Self::with_options(api_key, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, DEFAULT_MAX_RETRIES)
    }

    pub fn with_options(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
        max_retries: u32,
    ) -> IngestResult<Self> {
        Ok(Self {
            fetcher: HttpFetcher::new(timeout, max_retries)?,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    #[instrument(skip(self))]
    pub async fn current(&self, city: &str) -> IngestResult<Observation> {
        let url = build_url_with_params(
            &self.endpoint,
            &[("q", city), ("APPID", self.api_key.as_str())],
        )?;

        let data: OwmCurrentResponse = self.fetcher.fetch_json(&url).await?;
        let observation = Observation::try_from(data)?;
        debug!(?observation, "Weather data fetched");

        Ok(observation)
    }
}

#[async_trait::async_trait]
impl WeatherSource for OpenWeatherSource {
    fn name(&self) -> &str {
        "openweathermap"
    }

    async fn fetch(&self, city: &str) -> Result<Observation> {
        Ok(self.current(city).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source_for(server: &MockServer) -> OpenWeatherSource {
        OpenWeatherSource::with_options(
            "test-key",
            format!("{}/data/2.5/weather", server.uri()),
            Duration::from_secs(1),
            0,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_current_parses_observation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "London"))
            .and(query_param("APPID", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "weather": [{"id": 800, "main": "Clear", "description": "clear sky"}],
                "main": {
                    "temp": 288.15,
                    "feels_like": 287.0,
                    "temp_min": 286.5,
                    "temp_max": 290.0,
                    "pressure": 1012,
                    "humidity": 60
                },
                "name": "London"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let observation = source_for(&server).fetch("London").await.unwrap();

        assert_eq!(observation, Observation::new(288.15, 290.0, 286.5, "Clear"));
    }

    #[tokio::test]
    async fn test_missing_weather_entry_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "weather": [],
                "main": {"temp": 280.0, "temp_min": 279.0, "temp_max": 281.0}
            })))
            .mount(&server)
            .await;

        let err = source_for(&server).current("Nowhere").await.unwrap_err();
        assert!(matches!(err, IngestError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unknown_city_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"cod": "404", "message": "city not found"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = source_for(&server).current("Atlantis").await.unwrap_err();
        assert!(matches!(err, IngestError::Status { .. }));
    }
}
