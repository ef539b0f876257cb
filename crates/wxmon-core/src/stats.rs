//! Running temperature and condition statistics

use std::collections::HashMap;

/// Read-only aggregate view produced by [`StatisticsAggregator::summary`]
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    pub max_temperature: f64,
    pub min_temperature: f64,
    pub avg_temperature: f64,
    pub dominant_condition: String,
    pub dominant_count: u64,
    pub count: u64,
}

/// Streaming accumulator over every observation recorded for a city
///
/// Nothing is kept per observation: min, max, sum and the condition
/// frequency table are updated in place, and the dominant condition is
/// cached so that [`summary`](Self::summary) never walks the history.
#[derive(Debug, Clone)]
pub struct StatisticsAggregator {
    count: u64,
    sum: f64,
    max_temperature: f64,
    min_temperature: f64,
    condition_frequency: HashMap<String, u64>,
    dominant_condition: String,
    dominant_count: u64,
}

impl StatisticsAggregator {
    pub fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            max_temperature: f64::NEG_INFINITY,
            min_temperature: f64::INFINITY,
            condition_frequency: HashMap::new(),
            dominant_condition: String::new(),
            dominant_count: 0,
        }
    }

    /// Return every field to its initial state
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Fold one observation into the running statistics
    pub fn record(
        &mut self,
        temperature: f64,
        max_temperature: f64,
        min_temperature: f64,
        condition: &str,
    ) {
        self.count += 1;
        self.sum += temperature;

        if max_temperature > self.max_temperature {
            self.max_temperature = max_temperature;
        }
        if min_temperature < self.min_temperature {
            self.min_temperature = min_temperature;
        }

        let frequency = self
            .condition_frequency
            .entry(condition.to_string())
            .or_insert(0);
        *frequency += 1;

        // Strictly greater: the first condition to reach a count keeps it.
        if *frequency > self.dominant_count {
            self.dominant_count = *frequency;
            self.dominant_condition = condition.to_string();
        }
    }

    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            max_temperature: self.max_temperature,
            min_temperature: self.min_temperature,
            avg_temperature: self.average(),
            dominant_condition: self.dominant_condition.clone(),
            dominant_count: self.dominant_count,
            count: self.count,
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn frequency(&self, condition: &str) -> u64 {
        self.condition_frequency.get(condition).copied().unwrap_or(0)
    }
}

impl Default for StatisticsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_aggregator() {
        let stats = StatisticsAggregator::new();
        let summary = stats.summary();

        assert_eq!(summary.avg_temperature, 0.0);
        assert_eq!(summary.max_temperature, f64::NEG_INFINITY);
        assert_eq!(summary.min_temperature, f64::INFINITY);
        assert_eq!(summary.dominant_condition, "");
        assert_eq!(summary.dominant_count, 0);
        assert_eq!(summary.count, 0);
    }

    #[test]
    fn test_max_min_track_extremes() {
        let mut stats = StatisticsAggregator::new();
        stats.record(10.0, 12.0, 8.0, "Clear");
        stats.record(15.0, 18.0, 11.0, "Clear");
        stats.record(5.0, 7.0, 2.0, "Rain");
        stats.record(9.0, 11.0, 6.0, "Rain");

        let summary = stats.summary();
        assert_eq!(summary.max_temperature, 18.0);
        assert_eq!(summary.min_temperature, 2.0);
    }

    #[test]
    fn test_average_uses_current_temperature() {
        let mut stats = StatisticsAggregator::new();
        stats.record(10.0, 40.0, -5.0, "Clear");
        stats.record(20.0, 40.0, -5.0, "Clear");
        stats.record(30.0, 40.0, -5.0, "Clear");

        assert_eq!(stats.average(), 20.0);
        assert_eq!(stats.count(), 3);
    }

    #[test]
    fn test_dominant_first_to_reach_wins_tie() {
        let mut stats = StatisticsAggregator::new();
        for condition in ["A", "B", "A", "B"] {
            stats.record(0.0, 0.0, 0.0, condition);
        }

        let summary = stats.summary();
        assert_eq!(summary.dominant_condition, "A");
        assert_eq!(summary.dominant_count, 2);
        assert_eq!(stats.frequency("B"), 2);
    }

    #[test]
    fn test_dominant_replaced_when_strictly_exceeded() {
        let mut stats = StatisticsAggregator::new();
        for condition in ["Clear", "Rain", "Rain"] {
            stats.record(0.0, 0.0, 0.0, condition);
        }

        let summary = stats.summary();
        assert_eq!(summary.dominant_condition, "Rain");
        assert_eq!(summary.dominant_count, 2);
    }

    #[test]
    fn test_dominant_count_matches_frequency_table() {
        let mut stats = StatisticsAggregator::new();
        let conditions = ["Snow", "Clouds", "Clouds", "Snow", "Mist", "Snow", "Clouds"];
        for condition in conditions {
            stats.record(0.0, 0.0, 0.0, condition);
        }

        let max_frequency = ["Snow", "Clouds", "Mist"]
            .iter()
            .map(|c| stats.frequency(c))
            .max()
            .unwrap();
        let summary = stats.summary();
        assert_eq!(summary.dominant_count, max_frequency);
        // Snow reached 3 before Clouds did.
        assert_eq!(summary.dominant_condition, "Snow");
    }

    #[test]
    fn test_reset() {
        let mut stats = StatisticsAggregator::new();
        stats.record(10.0, 12.0, 8.0, "Clear");
        stats.reset();

        assert_eq!(stats.count(), 0);
        assert_eq!(stats.frequency("Clear"), 0);
        assert_eq!(stats.summary().max_temperature, f64::NEG_INFINITY);
    }
}
