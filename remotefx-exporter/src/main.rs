//! Prometheus exporter for RemoteFX session counters.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};

use remotefx_exporter::{
    CollectorRegistry, Exporter, ExporterConfig, HttpServer, RemoteFxCollector,
    SnapshotFileSource,
};

/// Prometheus exporter for RemoteFX session counters.
#[derive(Parser, Debug)]
#[command(name = "remotefx-exporter")]
#[command(about = "Export RemoteFX network and graphics counters as Prometheus metrics")]
#[command(version)]
struct Args {
    /// Path to configuration file (JSON5 format).
    #[arg(short, long)]
    config: Option<String>,

    /// HTTP listen address (overrides config).
    #[arg(long)]
    listen: Option<String>,

    /// Counter snapshot file (overrides config).
    #[arg(long)]
    snapshot: Option<String>,

    /// Log level (trace, debug, info, warn, error; overrides config).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        ExporterConfig::load_from_file(config_path)?
    } else {
        ExporterConfig::default()
    };

    // CLI overrides
    if let Some(listen) = args.listen {
        config.web.listen = listen;
    }
    if let Some(snapshot) = args.snapshot {
        config.source.snapshot_path = snapshot;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    config.validate()?;

    perfcounter_common::init_tracing(&config.logging)?;

    info!("Starting RemoteFX exporter");

    // Compose the registry explicitly; a bad descriptor table stops startup here.
    let mut registry = CollectorRegistry::new();
    registry.register(RemoteFxCollector::new(&config.web.namespace)?)?;

    let source = SnapshotFileSource::new(&config.source.snapshot_path);
    info!(
        path = %source.path().display(),
        collectors = ?registry.collector_names(),
        "Reading counter snapshots"
    );

    let exporter = Arc::new(Exporter::new(
        registry,
        source,
        config.web.namespace.clone(),
    ));

    // Parse listen address
    let listen_addr = config
        .web
        .listen
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address: {}", e))?;

    // Create shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let http_server = HttpServer::new(exporter.clone(), listen_addr, config.web.path.clone());
    let http_task = tokio::spawn(async move {
        if let Err(e) = http_server.run(shutdown_rx).await {
            error!("HTTP server error: {}", e);
        }
    });

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate_signal() => {
            info!("Received SIGTERM, shutting down...");
        }
    }

    // Signal shutdown
    shutdown_tx.send(true)?;

    // Wait for the server to drain
    let _ = tokio::time::timeout(Duration::from_secs(5), http_task).await;

    // Print final stats
    let stats = exporter.registry().stats();
    info!(
        scrapes_total = stats.scrapes_total,
        scrapes_succeeded = stats.scrapes_succeeded,
        collector_failures = stats.collector_failures,
        samples_emitted = stats.samples_emitted,
        "Final statistics"
    );

    info!("Exporter stopped");
    Ok(())
}

#[cfg(unix)]
async fn terminate_signal() {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            error!("Failed to install SIGTERM handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate_signal() {
    std::future::pending::<()>().await;
}
