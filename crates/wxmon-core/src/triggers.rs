//! Threshold triggers evaluated against each observation

use crate::types::{FieldValue, Observation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trigger evaluation error, scoped to a single rule
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TriggerError {
    #[error("Invalid attribute: {0}")]
    AttributeMissing(String),

    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("Cannot apply '{operator}' to {attribute}={value} with threshold {threshold}")]
    TypeMismatch {
        attribute: String,
        operator: String,
        value: String,
        threshold: String,
    },
}

pub type TriggerResult<T> = Result<T, TriggerError>;

/// Observation field a rule looks at
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Attribute {
    Temperature,
    MaxTemperature,
    MinTemperature,
    Condition,
    /// A name that no observation carries
    Unknown(String),
}

impl Attribute {
    pub fn as_str(&self) -> &str {
        match self {
            Attribute::Temperature => "temperature",
            Attribute::MaxTemperature => "maxTemperature",
            Attribute::MinTemperature => "minTemperature",
            Attribute::Condition => "condition",
            Attribute::Unknown(name) => name,
        }
    }
}

impl From<&str> for Attribute {
    fn from(name: &str) -> Self {
        match name.trim() {
            "temperature" => Attribute::Temperature,
            "maxTemperature" | "max_temperature" => Attribute::MaxTemperature,
            "minTemperature" | "min_temperature" => Attribute::MinTemperature,
            "condition" => Attribute::Condition,
            other => Attribute::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Attribute {
    fn from(name: String) -> Self {
        Attribute::from(name.as_str())
    }
}

impl From<Attribute> for String {
    fn from(attribute: Attribute) -> Self {
        attribute.as_str().to_string()
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operator of a rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    /// Accepted at configuration time, rejected when evaluated
    Other(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Eq => "==",
            Operator::Other(symbol) => symbol,
        }
    }
}

impl From<&str> for Operator {
    fn from(symbol: &str) -> Self {
        match symbol.trim() {
            ">" => Operator::Gt,
            ">=" => Operator::Ge,
            "<" => Operator::Lt,
            "<=" => Operator::Le,
            "==" => Operator::Eq,
            other => Operator::Other(other.to_string()),
        }
    }
}

impl From<String> for Operator {
    fn from(symbol: String) -> Self {
        Operator::from(symbol.as_str())
    }
}

impl From<Operator> for String {
    fn from(operator: Operator) -> Self {
        operator.as_str().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Threshold value of a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Threshold {
    Numeric(f64),
    Text(String),
}

impl Threshold {
    /// Interpret free-form input: numbers become numeric thresholds
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Threshold::Numeric(v),
            _ => Threshold::Text(raw.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Threshold::Numeric(v) => Some(*v),
            Threshold::Text(_) => None,
        }
    }

    /// Strict equality: both type and value must match
    pub fn equals(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Threshold::Numeric(t), FieldValue::Number(v)) => t == v,
            (Threshold::Text(t), FieldValue::Text(v)) => t == v,
            _ => false,
        }
    }
}

impl From<f64> for Threshold {
    fn from(v: f64) -> Self {
        Threshold::Numeric(v)
    }
}

impl From<&str> for Threshold {
    fn from(s: &str) -> Self {
        Threshold::Text(s.to_string())
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Numeric(v) => write!(f, "{}", v),
            Threshold::Text(s) => f.write_str(s),
        }
    }
}

/// A single `(attribute, operator, threshold)` condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerRule {
    pub attribute: Attribute,
    pub operator: Operator,
    pub threshold: Threshold,
}

impl TriggerRule {
    pub fn new(
        attribute: impl Into<Attribute>,
        operator: impl Into<Operator>,
        threshold: impl Into<Threshold>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            operator: operator.into(),
            threshold: threshold.into(),
        }
    }

    /// Check whether `value` satisfies this rule
    pub fn is_triggered(&self, value: &FieldValue) -> TriggerResult<bool> {
        match &self.operator {
            Operator::Gt => self.numeric(value).map(|(v, t)| v > t),
            Operator::Ge => self.numeric(value).map(|(v, t)| v >= t),
            Operator::Lt => self.numeric(value).map(|(v, t)| v < t),
            Operator::Le => self.numeric(value).map(|(v, t)| v <= t),
            Operator::Eq => Ok(self.threshold.equals(value)),
            Operator::Other(symbol) => Err(TriggerError::UnsupportedOperator(symbol.clone())),
        }
    }

    /// Evaluate against an observation, returning the fired trigger if any
    pub fn evaluate(&self, observation: &Observation) -> TriggerResult<Option<FiredTrigger>> {
        let value = observation
            .field(&self.attribute)
            .ok_or_else(|| TriggerError::AttributeMissing(self.attribute.to_string()))?;

        if self.is_triggered(&value)? {
            Ok(Some(FiredTrigger {
                rule: self.clone(),
                value,
            }))
        } else {
            Ok(None)
        }
    }

    fn numeric(&self, value: &FieldValue) -> TriggerResult<(f64, f64)> {
        match (value.as_f64(), self.threshold.as_f64()) {
            (Some(v), Some(t)) => Ok((v, t)),
            _ => Err(TriggerError::TypeMismatch {
                attribute: self.attribute.to_string(),
                operator: self.operator.to_string(),
                value: value.to_string(),
                threshold: self.threshold.to_string(),
            }),
        }
    }
}

impl fmt::Display for TriggerRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.attribute, self.operator, self.threshold)
    }
}

/// A rule that fired, with the observed value that fired it
#[derive(Debug, Clone, PartialEq)]
pub struct FiredTrigger {
    pub rule: TriggerRule,
    pub value: FieldValue,
}

impl fmt::Display for FiredTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Current: {})", self.rule, self.value)
    }
}

/// Outcome of one evaluation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggerReport {
    /// Fired rules, in rule insertion order
    pub fired: Vec<FiredTrigger>,

    /// Rules that could not be evaluated
    pub errors: Vec<TriggerError>,
}

impl TriggerReport {
    pub fn descriptions(&self) -> Vec<String> {
        self.fired.iter().map(|t| t.to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fired.is_empty() && self.errors.is_empty()
    }
}

/// Ordered collection of trigger rules
#[derive(Debug, Clone, Default)]
pub struct TriggerEvaluator {
    rules: Vec<TriggerRule>,
}

impl TriggerEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule. No validation and no deduplication.
    pub fn add_rule(
        &mut self,
        attribute: impl Into<Attribute>,
        operator: impl Into<Operator>,
        threshold: impl Into<Threshold>,
    ) {
        self.rules.push(TriggerRule::new(attribute, operator, threshold));
    }

    pub fn rules(&self) -> &[TriggerRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule; a failing rule never stops the others
    pub fn evaluate(&self, observation: &Observation) -> TriggerReport {
        let mut report = TriggerReport::default();

        for rule in &self.rules {
            match rule.evaluate(observation) {
                Ok(Some(fired)) => report.fired.push(fired),
                Ok(None) => {}
                Err(e) => report.errors.push(e),
            }
        }

        report
    }
}
