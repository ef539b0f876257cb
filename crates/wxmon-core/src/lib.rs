//! Core data types, statistics and trigger evaluation for wxmon
//!
//! This crate holds everything that touches the running statistics of a
//! monitored city: observations, the aggregator, trigger rules and the
//! [`WeatherMonitor`] that ties them together.

pub mod monitor;
pub mod pipeline;
pub mod stats;
pub mod triggers;
pub mod types;
pub mod units;

pub use monitor::*;
pub use pipeline::*;
pub use stats::*;
pub use triggers::*;
pub use types::*;
pub use units::*;
