//! Collectors turn counter snapshots into metric samples.

use tracing::{debug, error, trace};

use crate::descriptor::MetricDescriptor;
use crate::error::{CollectError, RegistryError};
use crate::filter;
use crate::mapping::ObjectMapping;
use crate::sink::{MetricSample, SampleSink};
use crate::source::CounterSource;

/// A unit of collection registered with the
/// [`CollectorRegistry`](crate::registry::CollectorRegistry).
///
/// Collectors are immutable once built and may serve overlapping scrapes.
pub trait Collector: Send + Sync {
    /// Short name, used as the `collector` label on exporter self-metrics.
    fn name(&self) -> &'static str;

    /// Every descriptor this collector can emit, in exposition order.
    fn descriptors(&self) -> Vec<&MetricDescriptor>;

    /// Run one collection pass, streaming samples into `sink`.
    ///
    /// On error, samples already emitted remain in the sink.
    fn collect<'a>(
        &'a self,
        source: &dyn CounterSource,
        sink: &mut dyn SampleSink<'a>,
    ) -> Result<(), CollectError>;
}

/// Collector for the `RemoteFX Network` and `RemoteFX Graphics` counter objects.
///
/// The network object is collected fully before the graphics object. A failure
/// on either stops the pass; network samples emitted before a graphics failure
/// are not withdrawn.
#[derive(Debug, Clone)]
pub struct RemoteFxCollector {
    network: ObjectMapping,
    graphics: ObjectMapping,
}

impl RemoteFxCollector {
    pub const NAME: &'static str = "remote_fx";

    /// Build the collector's descriptor tables under `namespace`.
    pub fn new(namespace: &str) -> Result<Self, RegistryError> {
        Ok(Self {
            network: ObjectMapping::network(namespace)?,
            graphics: ObjectMapping::graphics(namespace)?,
        })
    }

    pub fn network(&self) -> &ObjectMapping {
        &self.network
    }

    pub fn graphics(&self) -> &ObjectMapping {
        &self.graphics
    }

    /// Fetch, filter and emit one counter object. Returns the number of
    /// samples emitted.
    fn collect_object<'a>(
        mapping: &'a ObjectMapping,
        source: &dyn CounterSource,
        sink: &mut dyn SampleSink<'a>,
    ) -> Result<usize, CollectError> {
        let snapshot = source.fetch(mapping.object())?;
        debug!(
            object = mapping.object(),
            instances = snapshot.len(),
            "Fetched counter snapshot"
        );

        // Decode every instance before emitting anything: a missing field
        // fails the object as a whole.
        let rows = snapshot
            .instances
            .iter()
            .map(|instance| mapping.decode(instance).map(|values| (instance, values)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut emitted = 0;
        for (instance, values) in rows {
            if !filter::include(&instance.name) {
                trace!(
                    object = mapping.object(),
                    instance = %instance.name,
                    "Skipping non-remote session"
                );
                continue;
            }

            for (field, value) in mapping.mappings().iter().zip(values) {
                sink.emit(MetricSample::new(
                    &field.descriptor,
                    value,
                    vec![instance.name.clone()],
                ));
                emitted += 1;
            }
        }

        Ok(emitted)
    }
}

impl Collector for RemoteFxCollector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn descriptors(&self) -> Vec<&MetricDescriptor> {
        self.network
            .descriptors()
            .chain(self.graphics.descriptors())
            .collect()
    }

    fn collect<'a>(
        &'a self,
        source: &dyn CounterSource,
        sink: &mut dyn SampleSink<'a>,
    ) -> Result<(), CollectError> {
        for mapping in [&self.network, &self.graphics] {
            match Self::collect_object(mapping, source, sink) {
                Ok(emitted) => {
                    debug!(object = mapping.object(), emitted, "Collected counter object");
                }
                Err(e) => {
                    error!(object = mapping.object(), error = %e, "Failed collecting RemoteFX metrics");
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}
