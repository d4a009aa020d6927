//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the adapter.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge adapter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Operating mode forwarded to the application build.
    pub mode: String,

    /// Authority used when a request carries no `host` header.
    pub default_host: String,

    /// Log every inbound request, headers included, at info level.
    pub debug: bool,

    /// Origin paths, tried in order.
    pub origin_paths: Vec<OriginPathConfig>,

    /// Local invoke server settings.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            mode: "production".to_string(),
            default_host: "localhost".to_string(),
            debug: false,
            origin_paths: Vec::new(),
            server: ServerConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// One origin path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OriginPathConfig {
    /// Regular expression tested against the request path.
    pub pattern: String,

    /// Replacement template (`$1`, `${name}`) applied to matched paths
    /// before they are forwarded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<String>,
}

/// Invoke server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Base URL of the application that handles dynamic requests.
    pub app_url: String,

    /// Timeout for one invocation, application included, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            app_url: "http://127.0.0.1:3000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: AdapterConfig = toml::from_str("").unwrap();
        assert_eq!(config.mode, "production");
        assert_eq!(config.default_host, "localhost");
        assert!(config.origin_paths.is_empty());
        assert_eq!(config.server.request_timeout_secs, 30);
    }

    #[test]
    fn test_origin_paths_keep_order() {
        let config: AdapterConfig = toml::from_str(
            r#"
            mode = "development"

            [[origin_paths]]
            pattern = "^/build/"

            [[origin_paths]]
            pattern = "^/assets/(.*)$"
            rewrite = "/static/$1"

            [server]
            app_url = "http://127.0.0.1:4000"
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, "development");
        assert_eq!(config.origin_paths.len(), 2);
        assert_eq!(config.origin_paths[0].pattern, "^/build/");
        assert_eq!(config.origin_paths[1].rewrite.as_deref(), Some("/static/$1"));
        assert_eq!(config.server.app_url, "http://127.0.0.1:4000");
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
    }
}
