//! Application configuration structures.

use serde::{Deserialize, Serialize};
use solscope_core::telemetry::{LogFormat, TelemetryConfig};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream provider configuration.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Response cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "solscope".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

impl AppMetadata {
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Dashboard origin allowed to call the API in production.
    pub cors_origin: Option<String>,
    /// Dashboard origin allowed outside production (the Vite dev server).
    pub dev_cors_origin: String,
    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
    /// Built dashboard assets served in production.
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origin: None,
            dev_cors_origin: "http://localhost:4567".to_string(),
            max_body_bytes: 10 * 1024, // 10KB
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// Returns the listen address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Origin the CORS layer admits for the given environment.
    #[must_use]
    pub fn allowed_origin(&self, production: bool) -> Option<&str> {
        if production {
            self.cors_origin.as_deref()
        } else {
            Some(self.dev_cors_origin.as_str())
        }
    }
}

/// Upstream provider configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
    /// Static credential sent as `x-api-key`.
    pub api_key: String,
    /// Per-call timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://public-api.solana.tracker/v1".to_string(),
            api_key: String::new(),
            timeout_ms: 5000,
        }
    }
}

impl UpstreamConfig {
    /// Returns the per-call timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// TTL applied to routes without an override, in seconds.
    pub default_ttl_secs: u64,
    /// Period of the expired-entry sweep, in seconds.
    pub sweep_interval_secs: u64,
    /// Per-route TTL overrides keyed by endpoint name (`token`, `stats`, ...).
    pub route_ttl_secs: HashMap<String, u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: 60,
            sweep_interval_secs: 120,
            route_ttl_secs: HashMap::new(),
        }
    }
}

impl CacheConfig {
    /// Returns the default TTL as a Duration.
    #[must_use]
    pub const fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Returns the sweep interval as a Duration.
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// TTL for a named endpoint, falling back to the default.
    #[must_use]
    pub fn ttl_for(&self, endpoint: &str) -> Duration {
        self.route_ttl_secs
            .get(endpoint)
            .map_or_else(|| self.default_ttl(), |secs| Duration::from_secs(*secs))
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log format (json, pretty).
    pub log_format: LogFormat,
    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,
    /// Metrics endpoint path.
    pub metrics_path: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
            metrics_path: "/metrics".to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// Settings for the log subscriber.
    #[must_use]
    pub fn telemetry(&self) -> TelemetryConfig {
        TelemetryConfig {
            log_level: self.log_level.clone(),
            log_format: self.log_format,
        }
    }
}
