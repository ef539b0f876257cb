//! Database schema for stored daily summaries

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wxmon_core::DailySummary;

use crate::{DbError, DbResult};

/// Daily summary table record
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct DailySummaryRow {
    pub id: u64,
    pub city: String,
    pub date: NaiveDate,
    pub max_temperature: f64,
    pub min_temperature: f64,
    pub avg_temperature: f64,
    pub dominant_weather: String,
    pub dominant_weather_frequency: u64,
    pub created_at: DateTime<Utc>,
}

/// Reject values MySQL DOUBLE columns cannot hold
pub(crate) fn check_finite(summary: &DailySummary) -> DbResult<()> {
    let s = &summary.snapshot;
    for (field, value) in [
        ("max_temperature", s.max_temperature),
        ("min_temperature", s.min_temperature),
        ("avg_temperature", s.avg_temperature),
    ] {
        if !value.is_finite() {
            return Err(DbError::NonFinite { field, value });
        }
    }
    Ok(())
}

/// Table names
pub mod tables {
    pub const DAILY_SUMMARY: &str = "daily_weather_summary";
}

/// Summary table with single-column and compound `(city, date)` indexes
pub const CREATE_DAILY_SUMMARY_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS daily_weather_summary (
    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    city VARCHAR(255) NOT NULL,
    `date` DATE NOT NULL,
    max_temperature DOUBLE NOT NULL,
    min_temperature DOUBLE NOT NULL,
    avg_temperature DOUBLE NOT NULL,
    dominant_weather VARCHAR(64) NOT NULL,
    dominant_weather_frequency BIGINT UNSIGNED NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    INDEX idx_summary_city (city),
    INDEX idx_summary_date (`date`),
    INDEX idx_summary_city_date (city, `date` DESC)
)
"#;
