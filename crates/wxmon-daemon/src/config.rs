//! Daemon configuration from environment variables, layered over the TOML file

use anyhow::{bail, Context, Result};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use wxmon_config::AppConfig;
use wxmon_core::{TemperatureUnit, TriggerRule};

use crate::prompt::MonitorSetup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenWeather,
    Simulator,
}

#[derive(Clone)]
pub struct DaemonConfig {
    /// MySQL database connection URL
    pub database_url: String,

    pub provider: ProviderKind,

    /// OpenWeatherMap key (required for the OpenWeather provider)
    pub api_key: Option<String>,

    pub endpoint: String,

    /// Per-request timeout of the provider fetch
    pub request_timeout: Duration,

    /// Retries for network-class fetch failures
    pub max_retries: u32,

    /// Polling period (default: 60s)
    pub poll_interval: Duration,

    /// Persistence period (default: 180s)
    pub persist_interval: Duration,

    pub error_log_path: PathBuf,

    pub city: Option<String>,
    pub unit: Option<TemperatureUnit>,

    /// Triggers from the config file
    pub triggers: Vec<TriggerRule>,
}

impl fmt::Debug for DaemonConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DaemonConfig")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("request_timeout", &self.request_timeout)
            .field("max_retries", &self.max_retries)
            .field("poll_interval", &self.poll_interval)
            .field("persist_interval", &self.persist_interval)
            .field("error_log_path", &self.error_log_path)
            .field("city", &self.city)
            .field("unit", &self.unit)
            .field("triggers", &self.triggers.len())
            .finish_non_exhaustive()
    }
}

impl DaemonConfig {
    /// Load configuration from environment variables
    pub fn from_env(file: &AppConfig) -> Result<Self> {
        Self::from_lookup(file, |key| std::env::var(key).ok())
    }

    /// Resolve settings: environment first, then the config file, then defaults
    pub fn from_lookup<F>(file: &AppConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").context("DATABASE_URL environment variable not set")?;

        let provider = match lookup("WXMON_PROVIDER").as_deref() {
            None | Some("openweather") => ProviderKind::OpenWeather,
            Some("simulator") => ProviderKind::Simulator,
            Some(other) => bail!("Invalid WXMON_PROVIDER: {}", other),
        };

        let api_key = lookup("OPENWEATHER_API_KEY").filter(|k| !k.is_empty());
        if provider == ProviderKind::OpenWeather && api_key.is_none() {
            bail!("OPENWEATHER_API_KEY environment variable not set");
        }

        let poll_interval = match lookup("POLL_INTERVAL") {
            Some(v) => v.parse().context("Invalid POLL_INTERVAL")?,
            None => file.poll_interval_secs(),
        };
        let persist_interval = match lookup("PERSIST_INTERVAL") {
            Some(v) => v.parse().context("Invalid PERSIST_INTERVAL")?,
            None => file.persist_interval_secs(),
        };
        if poll_interval == 0 || persist_interval == 0 {
            bail!("Scheduling intervals must be greater than zero");
        }

        let error_log_path = lookup("ERROR_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| file.error_log_path());

        let city = lookup("WXMON_CITY")
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .or_else(|| file.city().map(str::to_string));

        let unit = match lookup("WXMON_UNIT") {
            Some(raw) => Some(raw.parse::<TemperatureUnit>()?),
            None => file.unit()?,
        };

        Ok(Self {
            database_url,
            provider,
            api_key,
            endpoint: file.endpoint(),
            request_timeout: Duration::from_secs(file.timeout_secs()),
            max_retries: file.max_retries(),
            poll_interval: Duration::from_secs(poll_interval),
            persist_interval: Duration::from_secs(persist_interval),
            error_log_path,
            city,
            unit,
            triggers: file.triggers.clone(),
        })
    }

    /// Non-interactive setup, available when a city is configured
    pub fn monitor_setup(&self) -> Option<MonitorSetup> {
        self.city.as_ref().map(|city| MonitorSetup {
            city: city.clone(),
            unit: self.unit.unwrap_or(TemperatureUnit::Celsius),
            triggers: Vec::new(),
        })
    }
}
