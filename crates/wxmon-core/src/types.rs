//! Core data types for weather observations and summaries

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One weather reading for a city
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub temperature: f64,
    pub max_temperature: f64,
    pub min_temperature: f64,

    /// Provider condition group ("Clear", "Rain", "Clouds", ...)
    pub condition: String,
}

impl Observation {
    pub fn new(
        temperature: f64,
        max_temperature: f64,
        min_temperature: f64,
        condition: impl Into<String>,
    ) -> Self {
        Self {
            temperature,
            max_temperature,
            min_temperature,
            condition: condition.into(),
        }
    }

    /// Look up a field by trigger attribute
    pub fn field(&self, attribute: &crate::Attribute) -> Option<FieldValue> {
        use crate::Attribute;

        match attribute {
            Attribute::Temperature => Some(FieldValue::Number(self.temperature)),
            Attribute::MaxTemperature => Some(FieldValue::Number(self.max_temperature)),
            Attribute::MinTemperature => Some(FieldValue::Number(self.min_temperature)),
            Attribute::Condition => Some(FieldValue::Text(self.condition.clone())),
            Attribute::Unknown(_) => None,
        }
    }
}

/// A single observation field value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(v) => write!(f, "{}", v),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// Current aggregate statistics for a city
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub city: String,
    pub max_temperature: f64,
    pub min_temperature: f64,
    pub avg_temperature: f64,
    pub dominant_weather: String,
    pub dominant_weather_frequency: u64,
    pub observation_count: u64,
}

impl Snapshot {
    /// True until the first observation has been recorded
    pub fn is_empty(&self) -> bool {
        self.observation_count == 0
    }
}

/// A snapshot stamped with the day it summarizes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySummary {
    #[serde(flatten)]
    pub snapshot: Snapshot,

    pub date: NaiveDate,
}

impl DailySummary {
    pub fn new(snapshot: Snapshot, date: NaiveDate) -> Self {
        Self { snapshot, date }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Attribute;

    #[test]
    fn test_observation_field_lookup() {
        let obs = Observation::new(21.5, 23.0, 19.0, "Clouds");

        assert_eq!(
            obs.field(&Attribute::Temperature),
            Some(FieldValue::Number(21.5))
        );
        assert_eq!(
            obs.field(&Attribute::MinTemperature).and_then(|v| v.as_f64()),
            Some(19.0)
        );
        assert_eq!(
            obs.field(&Attribute::Condition).as_ref().and_then(|v| v.as_str()),
            Some("Clouds")
        );
        assert_eq!(obs.field(&Attribute::Unknown("humidity".into())), None);
    }

    #[test]
    fn test_observation_serde() {
        let json = r#"{"temperature":280.0,"maxTemperature":281.5,"minTemperature":279.0,"condition":"Rain"}"#;
        let obs: Observation = serde_json::from_str(json).unwrap();

        assert_eq!(obs.max_temperature, 281.5);
        assert_eq!(obs.condition, "Rain");
    }

    #[test]
    fn test_daily_summary_flattens_snapshot() {
        let summary = DailySummary::new(
            Snapshot {
                city: "Oslo".into(),
                max_temperature: 12.5,
                min_temperature: 8.25,
                avg_temperature: 10.5,
                dominant_weather: "Clear".into(),
                dominant_weather_frequency: 1,
                observation_count: 1,
            },
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        );

        insta::assert_json_snapshot!(summary, @r###"
        {
          "city": "Oslo",
          "maxTemperature": 12.5,
          "minTemperature": 8.25,
          "avgTemperature": 10.5,
          "dominantWeather": "Clear",
          "dominantWeatherFrequency": 1,
          "observationCount": 1,
          "date": "2024-03-09"
        }
        "###);
    }
}
