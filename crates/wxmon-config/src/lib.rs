use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use wxmon_core::{TemperatureUnit, TriggerRule};

pub const DEFAULT_CONFIG_PATH: &str = "wxmon.toml";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_PERSIST_INTERVAL_SECS: u64 = 180;
pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_ERROR_LOG: &str = "cron_error.log";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MonitorConfig {
    pub city: Option<String>,
    /// "celsius" or "fahrenheit", any case
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScheduleConfig {
    pub poll_interval_secs: Option<u64>,
    pub persist_interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ErrorLogConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub monitor: Option<MonitorConfig>,
    #[serde(default)]
    pub triggers: Vec<TriggerRule>,
    pub schedule: Option<ScheduleConfig>,
    pub provider: Option<ProviderConfig>,
    pub error_log: Option<ErrorLogConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Unit(#[from] wxmon_core::UnitError),
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("provider.timeout_secs must be greater than zero")]
    ZeroTimeout,
}

impl AppConfig {
    /// Load configuration from WXMON_CONFIG path (TOML) if present, with reasonable defaults
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("WXMON_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(path)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let cfg = if path.exists() {
            let s = fs::read_to_string(path)?;
            toml::from_str::<AppConfig>(&s)?
        } else {
            AppConfig::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_secs() == 0 {
            return Err(ConfigError::ZeroInterval("poll_interval_secs"));
        }
        if self.persist_interval_secs() == 0 {
            return Err(ConfigError::ZeroInterval("persist_interval_secs"));
        }
        if self.timeout_secs() == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn city(&self) -> Option<&str> {
        self.monitor
            .as_ref()
            .and_then(|m| m.city.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Parsed temperature unit, if one is configured
    pub fn unit(&self) -> Result<Option<TemperatureUnit>, ConfigError> {
        match self.monitor.as_ref().and_then(|m| m.unit.as_deref()) {
            Some(raw) => Ok(Some(raw.parse()?)),
            None => Ok(None),
        }
    }

    pub fn poll_interval_secs(&self) -> u64 {
        self.schedule
            .as_ref()
            .and_then(|s| s.poll_interval_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
    }

    pub fn persist_interval_secs(&self) -> u64 {
        self.schedule
            .as_ref()
            .and_then(|s| s.persist_interval_secs)
            .unwrap_or(DEFAULT_PERSIST_INTERVAL_SECS)
    }

    pub fn endpoint(&self) -> String {
        self.provider
            .as_ref()
            .and_then(|p| p.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    pub fn timeout_secs(&self) -> u64 {
        self.provider
            .as_ref()
            .and_then(|p| p.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn max_retries(&self) -> u32 {
        self.provider
            .as_ref()
            .and_then(|p| p.max_retries)
            .unwrap_or(DEFAULT_MAX_RETRIES)
    }

    pub fn error_log_path(&self) -> PathBuf {
        self.error_log
            .as_ref()
            .and_then(|e| e.path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ERROR_LOG))
    }
}
