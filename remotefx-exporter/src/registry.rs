//! Explicit collector registry.
//!
//! Collectors are registered once at startup; the registry then runs them in
//! registration order on every scrape.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::collector::Collector;
use crate::descriptor::MetricDescriptor;
use crate::error::{CollectError, RegistryError};
use crate::sink::MetricSample;
use crate::source::CounterSource;

/// Result of running one collector during a scrape.
#[derive(Debug, Clone)]
pub struct CollectorOutcome {
    pub collector: &'static str,
    pub duration: Duration,
    pub error: Option<CollectError>,
}

impl CollectorOutcome {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything produced by one scrape.
#[derive(Debug)]
pub struct ScrapeReport<'a> {
    /// Every registered descriptor, in registration order.
    pub descriptors: Vec<&'a MetricDescriptor>,
    /// Samples in emission order, including those from collectors that failed.
    pub samples: Vec<MetricSample<'a>>,
    /// One outcome per collector, in registration order.
    pub outcomes: Vec<CollectorOutcome>,
}

impl ScrapeReport<'_> {
    /// True if every collector succeeded.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(CollectorOutcome::success)
    }
}

/// Registry statistics.
#[derive(Debug, Clone, Default)]
pub struct ScrapeStats {
    /// Total scrapes run.
    pub scrapes_total: u64,
    /// Scrapes where every collector succeeded.
    pub scrapes_succeeded: u64,
    /// Individual collector failures.
    pub collector_failures: u64,
    /// Samples emitted across all scrapes.
    pub samples_emitted: u64,
}

/// Thread-safe registry of collectors.
#[derive(Default)]
pub struct CollectorRegistry {
    collectors: Vec<Box<dyn Collector>>,
    stats: RwLock<ScrapeStats>,
}

impl CollectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collector.
    ///
    /// Fails if a collector with the same name is registered, or if any of its
    /// metric names is already taken.
    pub fn register<C: Collector + 'static>(&mut self, collector: C) -> Result<(), RegistryError> {
        if self.collectors.iter().any(|c| c.name() == collector.name()) {
            return Err(RegistryError::DuplicateCollector(
                collector.name().to_string(),
            ));
        }

        let mut names: HashSet<&str> = self
            .collectors
            .iter()
            .flat_map(|c| c.descriptors())
            .map(|d| d.name.as_str())
            .collect();
        for descriptor in collector.descriptors() {
            if !names.insert(descriptor.name.as_str()) {
                return Err(RegistryError::DuplicateMetric(descriptor.name.clone()));
            }
        }

        info!(
            collector = collector.name(),
            metrics = collector.descriptors().len(),
            "Registered collector"
        );
        self.collectors.push(Box::new(collector));
        Ok(())
    }

    /// Names of the registered collectors, in registration order.
    pub fn collector_names(&self) -> Vec<&'static str> {
        self.collectors.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }

    /// Run every collector once against `source`.
    ///
    /// A failing collector does not prevent the others from running.
    pub fn scrape<'a>(&'a self, source: &dyn CounterSource) -> ScrapeReport<'a> {
        let mut samples: Vec<MetricSample<'a>> = Vec::new();
        let mut outcomes = Vec::with_capacity(self.collectors.len());

        for collector in &self.collectors {
            let start = Instant::now();
            let result = collector.collect(source, &mut samples);
            let duration = start.elapsed();

            match &result {
                Ok(()) => debug!(
                    collector = collector.name(),
                    duration_secs = duration.as_secs_f64(),
                    "Collector succeeded"
                ),
                Err(e) => warn!(
                    collector = collector.name(),
                    duration_secs = duration.as_secs_f64(),
                    error = %e,
                    "Collector failed"
                ),
            }

            outcomes.push(CollectorOutcome {
                collector: collector.name(),
                duration,
                error: result.err(),
            });
        }

        let report = ScrapeReport {
            descriptors: self.collectors.iter().flat_map(|c| c.descriptors()).collect(),
            samples,
            outcomes,
        };

        let mut stats = self.stats.write();
        stats.scrapes_total += 1;
        if report.is_success() {
            stats.scrapes_succeeded += 1;
        }
        stats.collector_failures += report.outcomes.iter().filter(|o| !o.success()).count() as u64;
        stats.samples_emitted += report.samples.len() as u64;
        drop(stats);

        report
    }

    /// Get registry statistics.
    pub fn stats(&self) -> ScrapeStats {
        self.stats.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::RemoteFxCollector;
    use crate::descriptor::MetricKind;
    use crate::mapping::{GRAPHICS_FIELDS, GRAPHICS_OBJECT, NETWORK_FIELDS, NETWORK_OBJECT};
    use crate::sink::SampleSink;
    use crate::source::MemorySource;
    use perfcounter_common::{CounterSnapshot, Instance};

    /// Emits one fixed sample without touching the source.
    struct StaticCollector {
        name: &'static str,
        descriptor: MetricDescriptor,
    }

    impl StaticCollector {
        fn new(name: &'static str, metric: &str) -> Self {
            Self {
                name,
                descriptor: MetricDescriptor::new(metric, "static", MetricKind::Gauge, &[])
                    .unwrap(),
            }
        }
    }

    impl Collector for StaticCollector {
        fn name(&self) -> &'static str {
            self.name
        }

        fn descriptors(&self) -> Vec<&MetricDescriptor> {
            vec![&self.descriptor]
        }

        fn collect<'a>(
            &'a self,
            _source: &dyn CounterSource,
            sink: &mut dyn SampleSink<'a>,
        ) -> Result<(), CollectError> {
            sink.emit(MetricSample::new(&self.descriptor, 1.0, Vec::new()));
            Ok(())
        }
    }

    fn full_source(session: &str) -> MemorySource {
        let network = NETWORK_FIELDS
            .iter()
            .fold(Instance::new(session), |i, s| i.with_field(s.field, 1.0));
        let graphics = GRAPHICS_FIELDS
            .iter()
            .fold(Instance::new(session), |i, s| i.with_field(s.field, 2.0));
        MemorySource::new()
            .with_snapshot(CounterSnapshot::new(NETWORK_OBJECT).with_instance(network))
            .with_snapshot(CounterSnapshot::new(GRAPHICS_OBJECT).with_instance(graphics))
    }

    #[test]
    fn test_register_and_scrape() {
        let mut registry = CollectorRegistry::new();
        registry
            .register(RemoteFxCollector::new("windows").unwrap())
            .unwrap();

        assert_eq!(registry.collector_names(), vec!["remote_fx"]);

        let report = registry.scrape(&full_source("RDP-Tcp#0"));
        assert!(report.is_success());
        assert_eq!(report.samples.len(), 28);
        assert_eq!(report.descriptors.len(), 28);
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].collector, "remote_fx");

        let stats = registry.stats();
        assert_eq!(stats.scrapes_total, 1);
        assert_eq!(stats.scrapes_succeeded, 1);
        assert_eq!(stats.samples_emitted, 28);
    }

    #[test]
    fn test_register_duplicate_collector() {
        let mut registry = CollectorRegistry::new();
        registry.register(StaticCollector::new("static", "a")).unwrap();

        let err = registry
            .register(StaticCollector::new("static", "b"))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateCollector("static".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_duplicate_metric_name() {
        let mut registry = CollectorRegistry::new();
        registry
            .register(RemoteFxCollector::new("windows").unwrap())
            .unwrap();

        let err = registry
            .register(StaticCollector::new(
                "clash",
                "windows_remote_fx_net_loss_rate",
            ))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateMetric("windows_remote_fx_net_loss_rate".to_string())
        );
    }

    #[test]
    fn test_failed_collector_does_not_stop_others() {
        let mut registry = CollectorRegistry::new();
        registry
            .register(RemoteFxCollector::new("windows").unwrap())
            .unwrap();
        registry.register(StaticCollector::new("static", "up")).unwrap();

        let source = MemorySource::new().with_failure(NETWORK_OBJECT, "query failed");
        let report = registry.scrape(&source);

        assert!(!report.is_success());
        assert!(!report.outcomes[0].success());
        assert!(report.outcomes[1].success());
        assert_eq!(report.samples.len(), 1);
        assert_eq!(report.samples[0].descriptor.name, "up");

        let stats = registry.stats();
        assert_eq!(stats.scrapes_succeeded, 0);
        assert_eq!(stats.collector_failures, 1);
    }

    #[test]
    fn test_partial_samples_survive_in_report() {
        let mut registry = CollectorRegistry::new();
        registry
            .register(RemoteFxCollector::new("windows").unwrap())
            .unwrap();

        let network = NETWORK_FIELDS
            .iter()
            .fold(Instance::new("RDP-Tcp#0"), |i, s| i.with_field(s.field, 1.0));
        let source = MemorySource::new()
            .with_snapshot(CounterSnapshot::new(NETWORK_OBJECT).with_instance(network))
            .with_failure(GRAPHICS_OBJECT, "query failed");

        let report = registry.scrape(&source);
        assert!(!report.is_success());
        assert_eq!(report.samples.len(), 19);
    }

    #[test]
    fn test_empty_registry() {
        let registry = CollectorRegistry::new();
        assert!(registry.is_empty());

        let report = registry.scrape(&MemorySource::new());
        assert!(report.is_success());
        assert!(report.samples.is_empty());
    }
}
