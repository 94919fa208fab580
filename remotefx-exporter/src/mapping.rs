//! Static mapping from RemoteFX counter fields to Prometheus metrics.
//!
//! Each counter object has a fixed table of [`FieldSpec`]s. At startup the
//! tables are turned into [`ObjectMapping`]s, which validates metric names and
//! rejects duplicated metrics or raw fields. Nothing here changes afterwards.

use perfcounter_common::Instance;

use crate::descriptor::{MetricDescriptor, MetricKind, build_fq_name};
use crate::error::{CollectError, RegistryError};

/// Subsystem component of every RemoteFX metric name.
pub const SUBSYSTEM: &str = "remote_fx";

/// The single label carried by every RemoteFX metric.
pub const SESSION_LABEL: &str = "session_name";

/// Counter object holding per-session network statistics.
pub const NETWORK_OBJECT: &str = "RemoteFX Network";

/// Counter object holding per-session graphics statistics.
pub const GRAPHICS_OBJECT: &str = "RemoteFX Graphics";

/// Declaration of one metric and the raw counter field it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Metric name suffix, appended after namespace and subsystem.
    pub metric: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
    /// Raw field name as exposed by the counter provider.
    pub field: &'static str,
}

const fn gauge(metric: &'static str, field: &'static str, help: &'static str) -> FieldSpec {
    FieldSpec {
        metric,
        help,
        kind: MetricKind::Gauge,
        field,
    }
}

const fn counter(metric: &'static str, field: &'static str, help: &'static str) -> FieldSpec {
    FieldSpec {
        metric,
        help,
        kind: MetricKind::Counter,
        field,
    }
}

/// Metrics read from the `RemoteFX Network` object.
pub const NETWORK_FIELDS: &[FieldSpec] = &[
    gauge(
        "net_base_tcp_rrt",
        "Base TCP RTT",
        "Base TCP round-trip time (RTT) detected in milliseconds",
    ),
    gauge(
        "net_base_udp_rrt",
        "Base UDP RTT",
        "Base UDP round-trip time (RTT) detected in milliseconds.",
    ),
    gauge(
        "net_current_tcp_bandwidth",
        "Current TCP Bandwidth",
        "TCP Bandwidth detected in thousands of bits per second (1000 bps).",
    ),
    gauge(
        "net_current_tcp_rtt",
        "Current TCP RTT",
        "Average TCP round-trip time (RTT) detected in milliseconds.",
    ),
    gauge(
        "net_current_udp_bandwidth",
        "Current UDP Bandwidth",
        "UDP Bandwidth detected in thousands of bits per second (1000 bps).",
    ),
    gauge(
        "net_current_udp_rtt",
        "Current UDP RTT",
        "Average UDP round-trip time (RTT) detected in milliseconds.",
    ),
    counter(
        "net_fec_rate",
        "FEC Rate",
        "Forward Error Correction (FEC) percentage",
    ),
    counter("net_loss_rate", "Loss Rate", "Loss percentage"),
    counter(
        "net_retransmission_rate",
        "Retransmission Rate",
        "Percentage of packets that have been retransmitted",
    ),
    counter(
        "net_tcp_received_rate",
        "TCP Received Rate",
        "Rate in bits per second (bps) at which data is received over TCP.",
    ),
    counter(
        "net_tcp_sent_rate",
        "TCP Sent Rate",
        "Rate in bits per second (bps) at which data is sent over TCP.",
    ),
    counter(
        "net_total_received_rate",
        "Total Received Rate",
        "Rate in bits per second (bps) at which data is received.",
    ),
    counter(
        "net_total_sent_rate",
        "Total Sent Rate",
        "Rate in bits per second (bps) at which data is sent.",
    ),
    counter(
        "net_total_received_bytes",
        "Total Received Bytes",
        "(TotalReceivedBytes)",
    ),
    counter("net_total_sent_bytes", "Total Sent Bytes", "(TotalSentBytes)"),
    counter(
        "net_udp_packets_received_persec",
        "UDP Packets Received/sec",
        "Rate in packets per second at which packets are received over UDP.",
    ),
    counter(
        "net_udp_packets_sent_persec",
        "UDP Packets Sent/sec",
        "Rate in packets per second at which packets are sent over UDP.",
    ),
    counter(
        "net_udp_received_rate",
        "UDP Received Rate",
        "Rate in bits per second (bps) at which data is received over UDP.",
    ),
    counter(
        "net_udp_sent_rate",
        "UDP Sent Rate",
        "Rate in bits per second (bps) at which data is sent over UDP.",
    ),
];

/// Metrics read from the `RemoteFX Graphics` object.
///
/// The client/server "Frames Skipped" rows read the opposite raw field to
/// what their names say. Existing dashboards depend on this association, so
/// it is kept until the product owner confirms the intended mapping.
pub const GRAPHICS_FIELDS: &[FieldSpec] = &[
    gauge(
        "gfx_average_encoding_time",
        "Average Encoding Time",
        "Average frame encoding time in milliseconds",
    ),
    gauge(
        "gfx_frame_quality",
        "Frame Quality",
        "Quality of the output frame expressed as a percentage of the quality of the source frame.",
    ),
    counter(
        "gfx_frames_skipped_persec_insufficient_clt_res",
        "Frames Skipped/Second - Insufficient Server Resources",
        "Number of frames skipped per second due to insufficient client resources.",
    ),
    counter(
        "gfx_frames_skipped_persec_insufficient_net_res",
        "Frames Skipped/Second - Insufficient Network Resources",
        "Number of frames skipped per second due to insufficient network resources.",
    ),
    counter(
        "gfx_frames_skipped_persec_insufficient_srv_res",
        "Frames Skipped/Second - Insufficient Client Resources",
        "Number of frames skipped per second due to insufficient server resources.",
    ),
    gauge(
        "gfx_graphics_compression_ratio",
        "Graphics Compression ratio",
        "Ratio of the number of bytes encoded to the number of bytes input.",
    ),
    counter(
        "gfx_input_frames_persec",
        "Input Frames/Second",
        "Number of sources frames provided as input to RemoteFX graphics per second.",
    ),
    counter(
        "gfx_output_frames_persec",
        "Output Frames/Second",
        "Number of frames sent to the client per second.",
    ),
    counter(
        "gfx_source_frames_persec",
        "Source Frames/Second",
        "Number of frames composed by the source (DWM) per second.",
    ),
];

/// A built descriptor paired with the raw field it reads.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    pub descriptor: MetricDescriptor,
    pub field: &'static str,
}

/// Validated, immutable field mapping for one counter object.
#[derive(Debug, Clone)]
pub struct ObjectMapping {
    object: &'static str,
    mappings: Vec<FieldMapping>,
}

impl ObjectMapping {
    /// Build the mapping for `object` from its field table.
    ///
    /// Fails if a metric name is invalid, or if a metric name or raw field
    /// appears twice.
    pub fn build(
        object: &'static str,
        namespace: &str,
        specs: &[FieldSpec],
    ) -> Result<Self, RegistryError> {
        let mut mappings: Vec<FieldMapping> = Vec::with_capacity(specs.len());

        for spec in specs {
            let name = build_fq_name(namespace, SUBSYSTEM, spec.metric);

            if mappings.iter().any(|m| m.descriptor.name == name) {
                return Err(RegistryError::DuplicateMetric(name));
            }
            if mappings.iter().any(|m| m.field == spec.field) {
                return Err(RegistryError::DuplicateField {
                    object: object.to_string(),
                    field: spec.field.to_string(),
                });
            }

            let descriptor = MetricDescriptor::new(name, spec.help, spec.kind, &[SESSION_LABEL])?;
            mappings.push(FieldMapping {
                descriptor,
                field: spec.field,
            });
        }

        Ok(Self { object, mappings })
    }

    /// Mapping for the `RemoteFX Network` object.
    pub fn network(namespace: &str) -> Result<Self, RegistryError> {
        Self::build(NETWORK_OBJECT, namespace, NETWORK_FIELDS)
    }

    /// Mapping for the `RemoteFX Graphics` object.
    pub fn graphics(namespace: &str) -> Result<Self, RegistryError> {
        Self::build(GRAPHICS_OBJECT, namespace, GRAPHICS_FIELDS)
    }

    /// Counter object name this mapping reads.
    pub fn object(&self) -> &'static str {
        self.object
    }

    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &MetricDescriptor> {
        self.mappings.iter().map(|m| &m.descriptor)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Read every mapped field from `instance`, in mapping order.
    ///
    /// Values are passed through unchanged. A missing field is a decode
    /// failure of the whole object.
    pub fn decode(&self, instance: &Instance) -> Result<Vec<f64>, CollectError> {
        self.mappings
            .iter()
            .map(|m| {
                instance.field(m.field).ok_or_else(|| {
                    CollectError::unavailable(
                        self.object,
                        format!(
                            "instance '{}' is missing field '{}'",
                            instance.name, m.field
                        ),
                    )
                })
            })
            .collect()
    }
}
