//! # SolScope Server
//!
//! Main entry point for the SolScope backend.

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use solscope_config::{AppConfig, ConfigLoader};
use solscope_core::telemetry::{init_telemetry, TelemetryConfig};
use solscope_server::{startup, AppBuilder};
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.into_config(),
        Err(e) => {
            // Logging has no configuration yet; fall back to the defaults.
            let _ = init_telemetry(&TelemetryConfig::default());
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_telemetry(&config.observability.telemetry()) {
        eprintln!("Failed to initialise logging: {e}");
    }

    startup::print_banner();
    info!("Starting SolScope Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        error!("Application error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let mut builder = AppBuilder::new();

    if config.observability.metrics_enabled {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("failed to install Prometheus recorder")?;
        solscope_cache::register_metrics();
        builder = builder.with_metrics(handle);
    }

    startup::print_startup_info(&config);

    let app = builder
        .with_config(config)
        .build()
        .context("failed to build application")?;

    app.run(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
