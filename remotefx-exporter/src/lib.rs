//! Prometheus exporter for RemoteFX session performance counters.
//!
//! On every scrape the exporter reads the `RemoteFX Network` and
//! `RemoteFX Graphics` counter objects, drops instances that are not remote
//! sessions, and exposes one sample per metric per session, labelled with
//! `session_name`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │ Counter Source  │────>│    Collector    │────>│   HTTP Server   │
//! │  (snapshots)    │     │ (filter + map)  │     │   (/metrics)    │
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//! ```
//!
//! # Usage
//!
//! Run the exporter binary with a configuration file:
//!
//! ```bash
//! remotefx-exporter --config remotefx.json5
//! ```
//!
//! # Configuration
//!
//! See [`config::ExporterConfig`] for configuration options.

pub mod collector;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod exporter;
pub mod exposition;
pub mod filter;
pub mod http;
pub mod mapping;
pub mod registry;
pub mod sink;
pub mod source;

pub use collector::{Collector, RemoteFxCollector};
pub use config::ExporterConfig;
pub use descriptor::{MetricDescriptor, MetricKind};
pub use error::{CollectError, RegistryError};
pub use exporter::{Exporter, ScrapeOutput, SharedExporter};
pub use http::HttpServer;
pub use registry::{CollectorRegistry, ScrapeReport};
pub use sink::{MetricSample, SampleSink};
pub use source::{CounterSource, MemorySource, SnapshotFileSource};
