//! Simulated weather provider for running without an API key

use anyhow::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use wxmon_core::{Observation, WeatherSource, KELVIN_OFFSET};

const CONDITIONS: [&str; 5] = ["Clear", "Clouds", "Clouds", "Rain", "Mist"];

/// Generates synthetic Kelvin readings around a base temperature
pub struct SimulatorSource {
    base_celsius: f64,
    readings: AtomicU64,
}

impl SimulatorSource {
    pub fn new(base_celsius: f64) -> Self {
        Self {
            base_celsius,
            readings: AtomicU64::new(0),
        }
    }

    fn generate(&self, seed: u64) -> Observation {
        // Pseudo-random variation in [-5, 5)
        let variation = ((seed % 100) as f64 / 10.0) - 5.0;
        let temp = self.base_celsius + variation + KELVIN_OFFSET;
        let condition = CONDITIONS[(seed % CONDITIONS.len() as u64) as usize];

        Observation::new(temp, temp + 1.5, temp - 1.5, condition)
    }
}

impl Default for SimulatorSource {
    fn default() -> Self {
        Self::new(20.0)
    }
}

#[async_trait::async_trait]
impl WeatherSource for SimulatorSource {
    fn name(&self) -> &str {
        "simulator"
    }

    async fn fetch(&self, city: &str) -> Result<Observation> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        let n = self.readings.fetch_add(1, Ordering::Relaxed);
        let observation = self.generate(now.wrapping_add(n));

        tracing::debug!(%city, ?observation, "Simulated observation");
        Ok(observation)
    }
}
