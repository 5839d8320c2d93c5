//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, authorities and path fragments
//! - Validate value ranges (timeouts > 0, limits > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::uri::{Authority, PathAndQuery};
use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("upstream.address '{0}' is not a valid host:port authority")]
    UpstreamAddress(String),

    #[error("rewrite.replacement_host '{0}' is not a valid host")]
    ReplacementHost(String),

    #[error("rewrite.{field} '{value}' is not a valid URI path")]
    Path { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("listener.tls.{0} must not be empty")]
    TlsPath(&'static str),
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.trim().is_empty() {
            errors.push(ValidationError::TlsPath("cert_path"));
        }
        if tls.key_path.trim().is_empty() {
            errors.push(ValidationError::TlsPath("key_path"));
        }
    }

    if !is_authority(&config.upstream.address) {
        errors.push(ValidationError::UpstreamAddress(config.upstream.address.clone()));
    }

    let rewrite = &config.rewrite;
    if !rewrite.replacement_host.is_empty() && !is_authority(&rewrite.replacement_host) {
        errors.push(ValidationError::ReplacementHost(rewrite.replacement_host.clone()));
    }

    if !rewrite.base_path.is_empty() && !is_path_fragment(&rewrite.base_path) {
        errors.push(ValidationError::Path {
            field: "base_path",
            value: rewrite.base_path.clone(),
        });
    }

    if !rewrite.fallback_path.is_empty() && !is_path_fragment(&rewrite.fallback_path) {
        errors.push(ValidationError::Path {
            field: "fallback_path",
            value: rewrite.fallback_path.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.limits.max_request_body == 0 {
        errors.push(ValidationError::Zero("limits.max_request_body"));
    }
    if config.limits.max_response_body == 0 {
        errors.push(ValidationError::Zero("limits.max_response_body"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_authority(value: &str) -> bool {
    !value.is_empty() && Authority::from_str(value).is_ok()
}

/// Path fragments end up inside a request target, so they must parse as one
/// and must not smuggle a query or fragment.
fn is_path_fragment(value: &str) -> bool {
    if value.contains(['?', '#']) {
        return false;
    }
    let candidate = if value.starts_with('/') {
        value.to_string()
    } else {
        format!("/{}", value)
    };
    PathAndQuery::from_str(&candidate).is_ok()
}
