//! Scrape entry point: registry + counter source + exposition.

use std::sync::Arc;

use tracing::debug;

use crate::exposition;
use crate::registry::CollectorRegistry;
use crate::source::CounterSource;

/// Rendered result of one scrape.
#[derive(Debug, Clone)]
pub struct ScrapeOutput {
    /// Prometheus text exposition body.
    pub body: String,
    /// False if any collector failed. The body still holds every sample
    /// that was emitted.
    pub success: bool,
}

/// Runs collection passes against a fixed source and renders the result.
pub struct Exporter {
    registry: CollectorRegistry,
    source: Box<dyn CounterSource>,
    namespace: String,
}

impl Exporter {
    pub fn new(
        registry: CollectorRegistry,
        source: impl CounterSource + 'static,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            source: Box::new(source),
            namespace: namespace.into(),
        }
    }

    /// Run one synchronous collection pass and render it.
    pub fn scrape(&self) -> ScrapeOutput {
        let report = self.registry.scrape(self.source.as_ref());
        let success = report.is_success();
        let body = exposition::render(&report, &self.namespace);

        debug!(
            samples = report.samples.len(),
            success,
            bytes = body.len(),
            "Scrape complete"
        );

        ScrapeOutput { body, success }
    }

    pub fn registry(&self) -> &CollectorRegistry {
        &self.registry
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

/// Create a shareable exporter handle.
pub type SharedExporter = Arc<Exporter>;
