//! wxmon daemon - city weather monitor
//!
//! This binary coordinates:
//! - Periodic polling of the weather provider with trigger evaluation
//! - Periodic storage of the running daily summary to MySQL

mod config;
mod error_log;
mod prompt;
mod scheduler;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use wxmon_archive::SummaryArchiver;
use wxmon_config::AppConfig;
use wxmon_core::WeatherSource;
use wxmon_db::DbClient;
use wxmon_ingest::{OpenWeatherSource, SimulatorSource};

use crate::config::{DaemonConfig, ProviderKind};
use crate::error_log::ErrorLog;
use crate::scheduler::{PersistenceScheduler, PollingScheduler};

/// Base temperature of the simulated provider
const SIMULATOR_BASE_CELSIUS: f64 = 20.0;

/// Stored summaries listed at startup
const STARTUP_HISTORY_LIMIT: u32 = 7;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    wxmon_obs::init("wxmond");

    info!("Starting wxmon daemon");

    // Load configuration
    let file = AppConfig::load().context("Failed to load config file")?;
    let config = DaemonConfig::from_env(&file)?;
    info!("Loaded configuration: {:?}", config);

    // Initialize database connection
    let db_client = DbClient::new(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    db_client.ping().await.context("Database ping failed")?;
    db_client
        .ensure_schema()
        .await
        .context("Failed to create summary table")?;
    info!("Database connection verified");

    // City, unit and interactive triggers
    let setup = match config.monitor_setup() {
        Some(setup) => setup,
        None => {
            let unit = config.unit;
            tokio::task::spawn_blocking(move || prompt::ask_on_terminal(unit))
                .await
                .context("Prompt task failed")?
                .context("Monitor setup aborted")?
        }
    };

    let mut monitor = setup.into_monitor();
    for rule in &config.triggers {
        monitor.add_trigger(
            rule.attribute.clone(),
            rule.operator.clone(),
            rule.threshold.clone(),
        );
    }
    info!(
        city = monitor.city(),
        unit = %monitor.unit(),
        triggers = monitor.triggers().len(),
        "Monitor configured"
    );

    match db_client.latest_summary(monitor.city()).await {
        Ok(Some(last)) => info!(
            date = %last.date,
            max = last.max_temperature,
            min = last.min_temperature,
            avg = last.avg_temperature,
            dominant = %last.dominant_weather,
            "Last stored summary"
        ),
        Ok(None) => info!(city = monitor.city(), "No stored summaries yet"),
        Err(e) => warn!(error = %e, "Could not read last stored summary"),
    }

    match db_client
        .summaries_for_city(monitor.city(), STARTUP_HISTORY_LIMIT)
        .await
    {
        Ok(history) => {
            for row in &history {
                debug!(
                    date = %row.date,
                    avg = row.avg_temperature,
                    dominant = %row.dominant_weather,
                    frequency = row.dominant_weather_frequency,
                    "Stored summary"
                );
            }
            info!(city = monitor.city(), count = history.len(), "Recent history loaded");
        }
        Err(e) => warn!(error = %e, "Could not read stored history"),
    }

    let source: Arc<dyn WeatherSource> = match config.provider {
        ProviderKind::OpenWeather => Arc::new(
            OpenWeatherSource::with_options(
                config.api_key.clone().unwrap_or_default(),
                config.endpoint.clone(),
                config.request_timeout,
                config.max_retries,
            )
            .context("Failed to build weather client")?,
        ),
        ProviderKind::Simulator => Arc::new(SimulatorSource::new(SIMULATOR_BASE_CELSIUS)),
    };
    info!("Weather source ready: {}", source.name());

    let monitor = Arc::new(Mutex::new(monitor));

    let polling = PollingScheduler::new(
        source,
        Arc::clone(&monitor),
        Arc::new(ErrorLog::new(&config.error_log_path)),
        config.poll_interval,
    );
    let persistence = PersistenceScheduler::new(
        Arc::clone(&monitor),
        SummaryArchiver::new(Arc::new(db_client.clone())),
        config.persist_interval,
    );

    let poll_task = tokio::spawn(polling.run());
    let persist_task = tokio::spawn(persistence.run());

    info!("Daemon running - press Ctrl+C to stop");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");

    poll_task.abort();
    persist_task.abort();
    db_client.close().await;

    info!("wxmon daemon stopped");
    Ok(())
}
