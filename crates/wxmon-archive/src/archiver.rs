//! Snapshot-to-store archiving for the persistence cycle

use crate::{ArchiveError, ArchiveResult};
use chrono::{DateTime, Days, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, instrument};
use wxmon_core::{DailySummary, Snapshot, SummaryStore};

/// The day a summary taken at `now` describes: the previous UTC calendar day
pub fn summary_date(now: DateTime<Utc>) -> ArchiveResult<NaiveDate> {
    now.date_naive()
        .checked_sub_days(Days::new(1))
        .ok_or_else(|| ArchiveError::InvalidDate(now.to_rfc3339()))
}

/// Writes date-stamped snapshots to a summary store
#[derive(Clone)]
pub struct SummaryArchiver {
    store: Arc<dyn SummaryStore>,
}

impl SummaryArchiver {
    pub fn new(store: Arc<dyn SummaryStore>) -> Self {
        Self { store }
    }

    /// Stamp `snapshot` with the day before `now` and append it to the store
    ///
    /// Snapshots taken before any observation are refused: their
    /// temperatures are still the infinite sentinels and there is no
    /// dominant condition to record.
    #[instrument(skip(self, snapshot), fields(city = %snapshot.city))]
    pub async fn archive(&self, snapshot: Snapshot, now: DateTime<Utc>) -> ArchiveResult<DailySummary> {
        if snapshot.is_empty() {
            return Err(ArchiveError::EmptySnapshot(snapshot.city));
        }

        let date = summary_date(now)?;
        let summary = DailySummary::new(snapshot, date);

        self.store.save(&summary).await?;

        info!(
            "Weather stats saved for {} on {}",
            summary.snapshot.city,
            date.format("%a %b %d %Y")
        );
        Ok(summary)
    }
}
