//! Metric samples and the sink they are streamed into.

use crate::descriptor::MetricDescriptor;

/// One value of one metric for one label set, produced during a collection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample<'a> {
    pub descriptor: &'a MetricDescriptor,
    pub value: f64,
    /// Label values, positionally matching `descriptor.label_names`.
    pub label_values: Vec<String>,
}

impl<'a> MetricSample<'a> {
    pub fn new(descriptor: &'a MetricDescriptor, value: f64, label_values: Vec<String>) -> Self {
        Self {
            descriptor,
            value,
            label_values,
        }
    }

    /// Iterate `(label name, label value)` pairs.
    pub fn labels(&self) -> impl Iterator<Item = (&str, &str)> {
        self.descriptor
            .label_names
            .iter()
            .map(String::as_str)
            .zip(self.label_values.iter().map(String::as_str))
    }
}

/// Receiver of samples as a collector produces them.
///
/// Samples that reach the sink stay there even if the pass later fails.
pub trait SampleSink<'a> {
    fn emit(&mut self, sample: MetricSample<'a>);
}

impl<'a> SampleSink<'a> for Vec<MetricSample<'a>> {
    fn emit(&mut self, sample: MetricSample<'a>) {
        self.push(sample);
    }
}
