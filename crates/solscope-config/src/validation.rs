//! Configuration validation module.
//!
//! Checks every loaded configuration before the server starts so that a
//! missing credential or a zero timeout fails fast instead of at request time.

use crate::AppConfig;
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// The upstream credential is missing or blank.
    MissingApiKey,
    /// Port number is invalid (must be 1-65535).
    InvalidPort { value: u16 },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Duration value must be positive.
    NonPositiveDuration { name: String },
    /// Duration value exceeds its upper bound.
    DurationTooLarge { name: String, max: u64 },
    /// Request body limit must be positive.
    ZeroBodyLimit,
    /// Log level is invalid.
    InvalidLogLevel { value: String },
    /// Production needs an explicit dashboard origin.
    MissingCorsOrigin,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(
                f,
                "Upstream API key is not set (upstream.api_key or SOLANA_TRACKER_API_KEY)"
            ),
            Self::InvalidPort { value } => {
                write!(f, "Invalid port: {} (must be 1-65535)", value)
            }
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::NonPositiveDuration { name } => {
                write!(f, "'{}' must be positive", name)
            }
            Self::DurationTooLarge { name, max } => {
                write!(f, "'{}' must not exceed {}", name, max)
            }
            Self::ZeroBodyLimit => write!(f, "server.max_body_bytes must be positive"),
            Self::InvalidLogLevel { value } => write!(
                f,
                "Invalid log level: '{}' (valid: trace, debug, info, warn, error)",
                value
            ),
            Self::MissingCorsOrigin => write!(
                f,
                "server.cors_origin (or CLIENT_URL) is required in production"
            ),
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    /// Upper bound for `upstream.timeout_ms` (5 minutes).
    pub const MAX_TIMEOUT_MS: u64 = 5 * 60 * 1000;

    /// Upper bound for cache TTLs and the sweep interval (7 days).
    pub const MAX_TTL_SECS: u64 = 7 * 24 * 60 * 60;

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with every problem found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_upstream(config, &mut errors);
        Self::validate_server(config, &mut errors);
        Self::validate_cache(config, &mut errors);
        Self::validate_observability(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_upstream(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let upstream = &config.upstream;

        if upstream.api_key.trim().is_empty() {
            errors.push(ConfigValidationError::MissingApiKey);
        }

        match Url::parse(&upstream.base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "upstream.base_url".to_string(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "upstream.base_url".to_string(),
                message: e.to_string(),
            }),
        }

        Self::check_duration("upstream.timeout_ms", upstream.timeout_ms, Self::MAX_TIMEOUT_MS, errors);
    }

    fn validate_server(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let server = &config.server;

        if server.port == 0 {
            errors.push(ConfigValidationError::InvalidPort { value: server.port });
        }
        if server.max_body_bytes == 0 {
            errors.push(ConfigValidationError::ZeroBodyLimit);
        }
        if config.app.is_production() && server.cors_origin.is_none() {
            errors.push(ConfigValidationError::MissingCorsOrigin);
        }
    }

    fn validate_cache(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let cache = &config.cache;

        Self::check_duration("cache.default_ttl_secs", cache.default_ttl_secs, Self::MAX_TTL_SECS, errors);
        Self::check_duration(
            "cache.sweep_interval_secs",
            cache.sweep_interval_secs,
            Self::MAX_TTL_SECS,
            errors,
        );

        let mut overrides: Vec<_> = cache.route_ttl_secs.iter().collect();
        overrides.sort();
        for (route, ttl) in overrides {
            Self::check_duration(
                &format!("cache.route_ttl_secs.{}", route),
                *ttl,
                Self::MAX_TTL_SECS,
                errors,
            );
        }
    }

    fn check_duration(name: &str, value: u64, max: u64, errors: &mut Vec<ConfigValidationError>) {
        if value == 0 {
            errors.push(ConfigValidationError::NonPositiveDuration { name: name.to_string() });
        } else if value > max {
            errors.push(ConfigValidationError::DurationTooLarge {
                name: name.to_string(),
                max,
            });
        }
    }

    fn validate_observability(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let level = config.observability.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::InvalidLogLevel {
                value: config.observability.log_level.clone(),
            });
        }
    }
}

/// Formats validation errors for display.
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, error));
    }
    output
}
