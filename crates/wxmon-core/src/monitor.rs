//! Per-city monitor: unit policy, statistics and triggers

use crate::stats::StatisticsAggregator;
use crate::triggers::{Attribute, Operator, Threshold, TriggerEvaluator, TriggerReport};
use crate::types::{Observation, Snapshot};
use crate::units::TemperatureUnit;
use tracing::{debug, error, instrument, warn};

/// Owns the statistics and trigger rules for one city/unit pair
#[derive(Debug, Clone)]
pub struct WeatherMonitor {
    city: String,
    unit: TemperatureUnit,
    stats: StatisticsAggregator,
    triggers: TriggerEvaluator,
}

impl WeatherMonitor {
    pub fn new(city: impl Into<String>, unit: TemperatureUnit) -> Self {
        Self {
            city: city.into(),
            unit,
            stats: StatisticsAggregator::new(),
            triggers: TriggerEvaluator::new(),
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn triggers(&self) -> &TriggerEvaluator {
        &self.triggers
    }

    pub fn add_trigger(
        &mut self,
        attribute: impl Into<Attribute>,
        operator: impl Into<Operator>,
        threshold: impl Into<Threshold>,
    ) {
        self.triggers.add_rule(attribute, operator, threshold);
    }

    /// Convert a provider observation to the monitor's unit
    pub fn convert(&self, raw: Observation) -> Observation {
        Observation {
            temperature: self.unit.from_provider(raw.temperature),
            max_temperature: self.unit.from_provider(raw.max_temperature),
            min_temperature: self.unit.from_provider(raw.min_temperature),
            condition: raw.condition,
        }
    }

    /// Record a provider observation and evaluate triggers against it
    #[instrument(skip(self, raw), fields(city = %self.city))]
    pub fn ingest(&mut self, raw: Observation) -> TriggerReport {
        let observation = self.convert(raw);

        self.stats.record(
            observation.temperature,
            observation.max_temperature,
            observation.min_temperature,
            &observation.condition,
        );

        let report = self.triggers.evaluate(&observation);

        for fired in &report.fired {
            warn!(trigger = %fired, "Trigger met");
        }
        for e in &report.errors {
            error!(error = %e, "Trigger evaluation failed");
        }
        debug!(
            "Ingested observation #{} ({} trigger(s) met)",
            self.stats.count(),
            report.fired.len()
        );

        report
    }

    pub fn snapshot(&self) -> Snapshot {
        let summary = self.stats.summary();
        Snapshot {
            city: self.city.clone(),
            max_temperature: summary.max_temperature,
            min_temperature: summary.min_temperature,
            avg_temperature: summary.avg_temperature,
            dominant_weather: summary.dominant_condition,
            dominant_weather_frequency: summary.dominant_count,
            observation_count: summary.count,
        }
    }
}
