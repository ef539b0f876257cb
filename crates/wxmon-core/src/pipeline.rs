use anyhow::Result;

use crate::{DailySummary, Observation};

/// Provider of raw (Kelvin) observations for a city
#[async_trait::async_trait]
pub trait WeatherSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self, city: &str) -> Result<Observation>;
}

/// Durable destination for daily summaries
#[async_trait::async_trait]
pub trait SummaryStore: Send + Sync {
    async fn save(&self, summary: &DailySummary) -> Result<()>;
}
