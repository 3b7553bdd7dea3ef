//! Server startup utilities.

use solscope_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
   _____       _______
  / ___/____  / / ___/_________  ____  ___
  \__ \/ __ \/ /\__ \/ ___/ __ \/ __ \/ _ \
 ___/ / /_/ / /___/ / /__/ /_/ / /_/ /  __/
/____/\____/_//____/\___/\____/ .___/\___/
                             /_/
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let addr = config.server.addr();
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("Environment: {}", config.app.environment);
    info!("REST API:    http://{}/api/solana", addr);
    info!("Health:      http://{}/health", addr);
    info!("API Docs:    http://{}/swagger-ui", addr);
    if config.observability.metrics_enabled {
        info!("Metrics:     http://{}{}", addr, config.observability.metrics_path);
    }
    info!("Upstream:    {} (timeout {}ms)", config.upstream.base_url, config.upstream.timeout_ms);
    info!("Cache TTL:   {}s, sweep every {}s", config.cache.default_ttl_secs, config.cache.sweep_interval_secs);
    info!("{}", separator);
}
