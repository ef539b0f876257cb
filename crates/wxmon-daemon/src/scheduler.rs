//! Polling and persistence schedulers
//!
//! Both run on their own fixed period against the same monitor. Polling is
//! single-flight: a firing that arrives while the previous poll is still in
//! progress is dropped. Persistence has no such guard.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{error, info, warn};
use wxmon_archive::{ArchiveError, ArchiveResult, SummaryArchiver};
use wxmon_core::{DailySummary, Snapshot, WeatherMonitor, WeatherSource};

use crate::error_log::ErrorLog;

pub type SharedMonitor = Arc<Mutex<WeatherMonitor>>;

/// Time until the next UTC wall-clock multiple of `period`
pub fn delay_to_next_boundary(now: DateTime<Utc>, period: Duration) -> Duration {
    let period_ms = period.as_millis() as i64;
    if period_ms == 0 {
        return Duration::ZERO;
    }

    let rem = now.timestamp_millis().rem_euclid(period_ms);
    if rem == 0 {
        Duration::ZERO
    } else {
        Duration::from_millis((period_ms - rem) as u64)
    }
}

fn ticker(first_delay: Duration, period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + first_delay, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Running,
}

/// Releases the running flag when the poll cycle ends, however it ends
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Fetch-and-ingest scheduler
pub struct PollingScheduler {
    source: Arc<dyn WeatherSource>,
    monitor: SharedMonitor,
    error_log: Arc<ErrorLog>,
    period: Duration,
    running: Arc<AtomicBool>,
}

impl PollingScheduler {
    pub fn new(
        source: Arc<dyn WeatherSource>,
        monitor: SharedMonitor,
        error_log: Arc<ErrorLog>,
        period: Duration,
    ) -> Self {
        Self {
            source,
            monitor,
            error_log,
            period,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> PollState {
        if self.running.load(Ordering::Acquire) {
            PollState::Running
        } else {
            PollState::Idle
        }
    }

    /// Handle one timer firing
    ///
    /// Returns the spawned cycle, or `None` when a previous cycle is still
    /// running and this firing was skipped.
    pub fn tick(&self) -> Option<JoinHandle<()>> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("A previous poll is still in process. Skipping this execution.");
            return None;
        }

        let guard = RunningGuard(Arc::clone(&self.running));
        let source = Arc::clone(&self.source);
        let monitor = Arc::clone(&self.monitor);
        let error_log = Arc::clone(&self.error_log);

        Some(tokio::spawn(async move {
            let _guard = guard;
            info!(source = source.name(), "Poll cycle started");

            if let Err(e) = poll_once(source.as_ref(), &monitor).await {
                error!(error = %format!("{:#}", e), "Poll cycle failed");
                if let Err(io) = error_log.append(&format!("{:#}", e)) {
                    warn!(error = %io, path = ?error_log.path(), "Failed to write error log");
                }
            }

            info!("Poll cycle finished");
        }))
    }

    /// Run forever, first firing on the next wall-clock period boundary
    pub async fn run(self) {
        let delay = delay_to_next_boundary(Utc::now(), self.period);
        self.run_from(delay).await
    }

    pub async fn run_from(self, first_delay: Duration) {
        info!(period = ?self.period, "Polling scheduler started");
        let mut ticker = ticker(first_delay, self.period);
        loop {
            ticker.tick().await;
            let _ = self.tick();
        }
    }
}

/// One fetch-and-ingest cycle; the monitor is locked only for the ingest
async fn poll_once(source: &dyn WeatherSource, monitor: &Mutex<WeatherMonitor>) -> Result<Snapshot> {
    let city = monitor.lock().await.city().to_string();

    let observation = source
        .fetch(&city)
        .await
        .with_context(|| format!("Failed to fetch weather for {}", city))?;
    info!(?observation, "Weather data fetched");

    let mut monitor = monitor.lock().await;
    let report = monitor.ingest(observation);
    let snapshot = monitor.snapshot();
    drop(monitor);

    info!(
        triggers_met = ?report.descriptions(),
        max = snapshot.max_temperature,
        min = snapshot.min_temperature,
        avg = snapshot.avg_temperature,
        dominant = %snapshot.dominant_weather,
        frequency = snapshot.dominant_weather_frequency,
        "Daily weather summary"
    );
    Ok(snapshot)
}

/// Snapshot-and-store scheduler
pub struct PersistenceScheduler {
    monitor: SharedMonitor,
    archiver: SummaryArchiver,
    period: Duration,
}

impl PersistenceScheduler {
    pub fn new(monitor: SharedMonitor, archiver: SummaryArchiver, period: Duration) -> Self {
        Self {
            monitor,
            archiver,
            period,
        }
    }

    /// Store the current snapshot as yesterday's summary
    pub async fn persist_once(&self) -> ArchiveResult<DailySummary> {
        let snapshot = self.monitor.lock().await.snapshot();
        self.archiver.archive(snapshot, Utc::now()).await
    }

    pub async fn run(self) {
        let delay = delay_to_next_boundary(Utc::now(), self.period);
        self.run_from(delay).await
    }

    pub async fn run_from(self, first_delay: Duration) {
        info!(period = ?self.period, "Persistence scheduler started");
        let mut ticker = ticker(first_delay, self.period);
        loop {
            ticker.tick().await;
            info!("Starting the job to save yesterday's weather stats...");

            match self.persist_once().await {
                Ok(_) => {}
                Err(ArchiveError::EmptySnapshot(city)) => {
                    warn!(%city, "No observations yet, skipping save");
                }
                Err(e) => error!(error = %e, "Error saving weather stats"),
            }
        }
    }
}
