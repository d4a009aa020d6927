//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every origin-path pattern
//! - Validate addresses, URLs and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AdapterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use regex::Regex;
use std::fmt;
use std::net::SocketAddr;
use url::Url;

use crate::config::schema::AdapterConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &AdapterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.mode.trim().is_empty() {
        errors.push(ValidationError::new("mode", "must not be empty"));
    }

    if config.default_host.is_empty() || config.default_host.contains('/') {
        errors.push(ValidationError::new(
            "default_host",
            "must be a bare authority such as 'localhost'",
        ));
    } else if Url::parse(&format!("https://{}", config.default_host)).is_err() {
        errors.push(ValidationError::new("default_host", "is not a valid authority"));
    }

    for (i, path) in config.origin_paths.iter().enumerate() {
        if let Err(e) = Regex::new(&path.pattern) {
            errors.push(ValidationError::new(
                format!("origin_paths[{}].pattern", i),
                e.to_string(),
            ));
        }
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }

    match Url::parse(&config.server.app_url) {
        Ok(url) if url.scheme() == "http" && url.host().is_some() => {}
        _ => errors.push(ValidationError::new(
            "server.app_url",
            format!("'{}' is not an absolute http URL", config.server.app_url),
        )),
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "server.request_timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::OriginPathConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&AdapterConfig::default()), Ok(()));
    }

    #[test]
    fn test_invalid_pattern_names_its_index() {
        let mut config = AdapterConfig::default();
        config.origin_paths.push(OriginPathConfig {
            pattern: "^/ok/".to_string(),
            rewrite: None,
        });
        config.origin_paths.push(OriginPathConfig {
            pattern: "^/bad/(".to_string(),
            rewrite: Some("/x".to_string()),
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "origin_paths[1].pattern");
    }

    #[test]
    fn test_server_fields() {
        let mut config = AdapterConfig::default();
        config.server.bind_address = "not-an-address".to_string();
        config.server.app_url = "/relative".to_string();
        config.server.request_timeout_secs = 0;

        let fields: Vec<_> = validate_config(&config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(
            fields,
            [
                "server.bind_address",
                "server.app_url",
                "server.request_timeout_secs"
            ]
        );
    }

    #[test]
    fn test_default_host_must_be_authority() {
        let mut config = AdapterConfig::default();
        config.default_host = "example.com/path".to_string();
        assert_eq!(validate_config(&config).unwrap_err()[0].field, "default_host");
    }
}
