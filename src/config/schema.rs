//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the filter.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the rewriting proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Backend service the rewritten requests are forwarded to.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Subdomain rewrite and fallback rules.
    pub rewrite: RewriteSettings,

    /// Buffering limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration. Requests accepted over TLS build
    /// `https` fallback URLs.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Upstream (next handler) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Backend address (e.g., "127.0.0.1:3000").
    pub address: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response, fallback included) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Rewrite rules as written in the config file.
///
/// Converted into the immutable [`crate::rewrite::RewriteConfig`] at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RewriteSettings {
    /// Derive the identifier from the leftmost label of the `Host` header.
    pub rewrite_subdomain: bool,

    /// Host sent upstream instead of the derived one. Empty keeps the derived host.
    pub replacement_host: String,

    /// Path prefix placed before the identifier. A leading `/` is added when missing.
    pub base_path: String,

    /// Keep the original request path after the base path.
    pub keep_path: bool,

    /// Fallback path tried when the upstream answers 404. Empty disables fallback.
    pub fallback_path: String,
}

impl Default for RewriteSettings {
    fn default() -> Self {
        Self {
            rewrite_subdomain: true,
            replacement_host: String::new(),
            base_path: String::new(),
            keep_path: true,
            fallback_path: String::new(),
        }
    }
}

/// Body buffering limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body kept in memory for fallback replay, in bytes.
    pub max_request_body: usize,

    /// Maximum upstream response captured before the fallback decision, in bytes.
    pub max_response_body: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_body: 2 * 1024 * 1024, // 2MB
            max_response_body: 16 * 1024 * 1024, // 16MB
        }
    }
}

/// Log verbosity accepted in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Error,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    /// Filter directive understood by `tracing_subscriber::EnvFilter`.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (ERROR, INFO, DEBUG).
    pub log_level: LogLevel,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_plugin_defaults() {
        let config = ProxyConfig::default();
        assert!(config.rewrite.rewrite_subdomain);
        assert!(config.rewrite.keep_path);
        assert!(config.rewrite.replacement_host.is_empty());
        assert!(config.rewrite.base_path.is_empty());
        assert!(config.rewrite.fallback_path.is_empty());
        assert_eq!(config.observability.log_level, LogLevel::Info);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [rewrite]
            base_path = "api"
            fallback_path = "index.html"

            [observability]
            log_level = "DEBUG"
            "#,
        )
        .unwrap();

        assert_eq!(config.rewrite.base_path, "api");
        assert_eq!(config.rewrite.fallback_path, "index.html");
        assert!(config.rewrite.keep_path);
        assert_eq!(config.observability.log_level, LogLevel::Debug);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let result: Result<ProxyConfig, _> = toml::from_str(
            r#"
            [observability]
            log_level = "TRACE"
            "#,
        );
        assert!(result.is_err());
    }
}
