//! Temperature unit handling
//!
//! Providers report temperatures in Kelvin. Only the Celsius mode converts;
//! Fahrenheit mode hands provider values through untouched.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Offset between the Kelvin and Celsius scales
pub const KELVIN_OFFSET: f64 = 273.15;

/// Unit conversion error
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum UnitError {
    #[error("Invalid temperature type: {0}. It should be either celsius or fahrenheit")]
    UnknownTemperatureUnit(String),
}

/// Display unit selected for a monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    /// Apply this unit's policy to a provider (Kelvin) reading
    pub fn from_provider(&self, kelvin: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => kelvin_to_celsius(kelvin),
            // Provider values are passed through as-is.
            TemperatureUnit::Fahrenheit => kelvin,
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "celsius" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(UnitError::UnknownTemperatureUnit(s.to_string())),
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kelvin_to_celsius() {
        assert!((kelvin_to_celsius(300.15) - 27.0).abs() < 1e-9);
        assert!((kelvin_to_celsius(273.15) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_unit_parse_is_case_insensitive() {
        assert_eq!("Celsius".parse(), Ok(TemperatureUnit::Celsius));
        assert_eq!("FAHRENHEIT".parse(), Ok(TemperatureUnit::Fahrenheit));
        assert_eq!(" celsius ".parse(), Ok(TemperatureUnit::Celsius));
    }

    #[test]
    fn test_unit_parse_rejects_unknown() {
        let err = "kelvin".parse::<TemperatureUnit>().unwrap_err();
        assert_eq!(err, UnitError::UnknownTemperatureUnit("kelvin".into()));
    }

    #[test]
    fn test_fahrenheit_passes_provider_value_through() {
        assert_eq!(TemperatureUnit::Fahrenheit.from_provider(300.15), 300.15);
    }
}
