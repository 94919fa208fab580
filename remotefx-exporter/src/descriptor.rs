//! Metric descriptors and Prometheus naming rules.

use crate::error::RegistryError;

/// Semantic type of an exported metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Instantaneous measurement.
    Gauge,
    /// Accumulating or per-interval rate measurement.
    Counter,
}

impl MetricKind {
    /// Get the TYPE comment string for Prometheus exposition format.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
        }
    }
}

/// Immutable description of one exported metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDescriptor {
    /// Fully-qualified metric name.
    pub name: String,
    pub help: String,
    pub kind: MetricKind,
    /// Label names, matched by position against a sample's label values.
    pub label_names: Vec<String>,
}

impl MetricDescriptor {
    /// Create a descriptor, validating the metric and label names.
    pub fn new(
        name: impl Into<String>,
        help: impl Into<String>,
        kind: MetricKind,
        label_names: &[&str],
    ) -> Result<Self, RegistryError> {
        let name = name.into();
        if !is_valid_metric_name(&name) {
            return Err(RegistryError::InvalidMetricName(name));
        }

        for label in label_names {
            if !is_valid_label_name(label) {
                return Err(RegistryError::InvalidLabelName {
                    metric: name,
                    label: label.to_string(),
                });
            }
        }

        Ok(Self {
            name,
            help: help.into(),
            kind,
            label_names: label_names.iter().map(|l| l.to_string()).collect(),
        })
    }
}

/// Build a fully-qualified metric name: `{namespace}_{subsystem}_{name}`.
///
/// Empty components are skipped.
pub fn build_fq_name(namespace: &str, subsystem: &str, name: &str) -> String {
    [namespace, subsystem, name]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
}

/// Check a metric name against `[a-zA-Z_:][a-zA-Z0-9_:]*`.
pub fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// Check a label name against `[a-zA-Z_][a-zA-Z0-9_]*`.
///
/// Names starting with `__` are reserved and rejected.
pub fn is_valid_label_name(name: &str) -> bool {
    if name.starts_with("__") {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
