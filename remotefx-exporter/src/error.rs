//! Error types for collection and registry composition.

use thiserror::Error;

/// Errors raised during a collection pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollectError {
    /// The counter provider could not be queried, or its snapshot could not be
    /// decoded (including an instance missing a mapped field).
    #[error("Counter object '{object}' unavailable: {reason}")]
    SourceUnavailable { object: String, reason: String },
}

impl CollectError {
    /// Create a source-unavailable error for a counter object.
    pub fn unavailable(object: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            object: object.into(),
            reason: reason.into(),
        }
    }

    /// Name of the counter object that failed.
    pub fn object(&self) -> &str {
        match self {
            Self::SourceUnavailable { object, .. } => object,
        }
    }
}

/// Errors raised while building descriptor tables or registering collectors.
///
/// All of these are fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Invalid metric name: {0}")]
    InvalidMetricName(String),

    #[error("Invalid label name '{label}' on metric {metric}")]
    InvalidLabelName { metric: String, label: String },

    #[error("Duplicate metric name: {0}")]
    DuplicateMetric(String),

    #[error("Raw field '{field}' of object '{object}' is mapped more than once")]
    DuplicateField { object: String, field: String },

    #[error("Collector '{0}' is already registered")]
    DuplicateCollector(String),
}
