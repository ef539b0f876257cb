//! In-process summary store

use anyhow::Result;
use tokio::sync::Mutex;
use wxmon_core::{DailySummary, SummaryStore};

/// Keeps every saved summary in memory, in save order
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<DailySummary>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<DailySummary> {
        self.records.lock().await.clone()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait::async_trait]
impl SummaryStore for MemoryStore {
    async fn save(&self, summary: &DailySummary) -> Result<()> {
        self.records.lock().await.push(summary.clone());
        Ok(())
    }
}
