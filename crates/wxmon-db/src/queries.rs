//! Database query operations for the summary table

use crate::schema::{check_finite, DailySummaryRow};
use crate::{DbClient, DbResult};
use sqlx::Row;
use tracing::{debug, instrument};
use wxmon_core::{DailySummary, SummaryStore};

impl DbClient {
    /// Append a daily summary; repeated dates are kept as separate rows
    #[instrument(skip(self, summary), fields(city = %summary.snapshot.city, date = %summary.date))]
    pub async fn insert_daily_summary(&self, summary: &DailySummary) -> DbResult<u64> {
        check_finite(summary)?;
        let s = &summary.snapshot;

        let result = sqlx::query(
            r#"
            INSERT INTO daily_weather_summary (
                city, `date`,
                max_temperature, min_temperature, avg_temperature,
                dominant_weather, dominant_weather_frequency
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&s.city)
        .bind(summary.date)
        .bind(s.max_temperature)
        .bind(s.min_temperature)
        .bind(s.avg_temperature)
        .bind(&s.dominant_weather)
        .bind(s.dominant_weather_frequency)
        .execute(self.pool())
        .await?;

        let id = result.last_insert_id();
        debug!("Inserted daily summary #{}", id);
        Ok(id)
    }

    /// Most recent summaries for a city, newest date first
    #[instrument(skip(self))]
    pub async fn summaries_for_city(&self, city: &str, limit: u32) -> DbResult<Vec<DailySummaryRow>> {
        let records = sqlx::query_as::<_, DailySummaryRow>(
            r#"
            SELECT * FROM daily_weather_summary
            WHERE city = ?
            ORDER BY `date` DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(city)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        debug!("Retrieved {} summaries for {}", records.len(), city);
        Ok(records)
    }

    /// Latest stored summary for a city
    #[instrument(skip(self))]
    pub async fn latest_summary(&self, city: &str) -> DbResult<Option<DailySummaryRow>> {
        let record = sqlx::query_as::<_, DailySummaryRow>(
            r#"
            SELECT * FROM daily_weather_summary
            WHERE city = ?
            ORDER BY `date` DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(city)
        .fetch_optional(self.pool())
        .await?;

        Ok(record)
    }

    /// Get count of stored summaries for a city
    #[instrument(skip(self))]
    pub async fn count_summaries(&self, city: &str) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM daily_weather_summary WHERE city = ?")
            .bind(city)
            .fetch_one(self.pool())
            .await?;

        Ok(row.get("count"))
    }
}

#[async_trait::async_trait]
impl SummaryStore for DbClient {
    async fn save(&self, summary: &DailySummary) -> anyhow::Result<()> {
        self.insert_daily_summary(summary).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wxmon_core::{Observation, TemperatureUnit, WeatherMonitor};

    // Requires a reachable MySQL instance:
    // TEST_DATABASE_URL=mysql://root@localhost/wxmon_test cargo test -- --ignored
    #[tokio::test]
    #[ignore]
    async fn test_summary_round_trip() -> anyhow::Result<()> {
        let url = std::env::var("TEST_DATABASE_URL")
            .unwrap_or_else(|_| "mysql://root@localhost/wxmon_test".to_string());
        let db = DbClient::new(&url).await?;
        db.ensure_schema().await?;

        let city = format!("roundtrip-{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0));
        let mut monitor = WeatherMonitor::new(city.clone(), TemperatureUnit::Fahrenheit);
        monitor.ingest(Observation::new(10.0, 12.0, 8.0, "Clear"));

        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let summary = DailySummary::new(monitor.snapshot(), date);
        let earlier = DailySummary::new(monitor.snapshot(), date.pred_opt().unwrap());
        db.save(&earlier).await?;
        db.save(&summary).await?;
        db.save(&summary).await?;

        assert_eq!(db.count_summaries(&city).await?, 3);

        let recent = db.summaries_for_city(&city, 2).await?;
        assert_eq!(recent.len(), 2);
        assert!(recent.iter().all(|r| r.date == date));
        assert!(recent[0].id > recent[1].id);

        let history = db.summaries_for_city(&city, 10).await?;
        let dates: Vec<_> = history.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date, date, date.pred_opt().unwrap()]);

        let row = db.latest_summary(&city).await?.expect("stored row");
        assert_eq!(row.date, date);
        assert_eq!(row.max_temperature, 12.0);
        assert_eq!(row.min_temperature, 8.0);
        assert_eq!(row.avg_temperature, 10.0);
        assert_eq!(row.dominant_weather, "Clear");
        assert_eq!(row.dominant_weather_frequency, 1);

        sqlx::query("DELETE FROM daily_weather_summary WHERE city = ?")
            .bind(&city)
            .execute(db.pool())
            .await?;
        Ok(())
    }
}
