//! Host and path rewriting.
//!
//! # Responsibilities
//! - Extract the identifier from the request host
//! - Replace the host (derived or configured replacement)
//! - Prefix the path with the base path and identifier
//! - Record the originals in marker headers so later passes skip the work

use std::str::FromStr;

use axum::http::{
    header::HOST,
    uri::{Authority, PathAndQuery},
    HeaderMap, HeaderValue, Request, Uri,
};
use thiserror::Error;
use tracing::Span;

use super::escape::unescape_path;
use super::identifier::IdentifierPattern;
use super::markers::{marker, X_REPLACED_HOST, X_REPLACED_PATH};
use super::rules::RewriteConfig;
use crate::observability::metrics;

/// Errors raised by the rewrite engine.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// The identifier pattern failed to compile. Only happens at construction.
    #[error("identifier pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),

    /// A value could not be placed into a header.
    #[error("invalid header value '{0}'")]
    InvalidHeader(String),

    /// The rewritten request target is not a valid URI.
    #[error("rewritten request target '{0}' is not a valid URI")]
    InvalidUri(String),
}

/// What the rewrite produced, consumed by the fallback dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// Configured base path plus the identifier segment, without the original path.
    pub base_path: String,
    /// Unescaped form of the request path after the rewrite.
    pub logical_path: String,
}

/// Rewrites requests in place according to one [`RewriteConfig`].
///
/// Holds no per-request state; safe to share across tasks.
#[derive(Debug)]
pub struct RewriteEngine {
    config: RewriteConfig,
    pattern: IdentifierPattern,
    span: Span,
}

impl RewriteEngine {
    /// Create an engine. Log events are emitted inside `span`.
    pub fn new(config: RewriteConfig, span: Span) -> Result<Self, RewriteError> {
        let pattern = IdentifierPattern::new()?;
        Ok(Self {
            config,
            pattern,
            span,
        })
    }

    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// Rewrite host and path of `req`, unless marker headers show a previous
    /// pass already did.
    pub fn rewrite<B>(&self, req: &mut Request<B>) -> Result<RewriteOutcome, RewriteError> {
        let _entered = self.span.enter();

        let host = request_host(req).to_string();
        tracing::info!(
            host = %host,
            path = %req.uri().path(),
            url = %req.uri(),
            "Original request"
        );

        let (identifier, base_host) = self.identifier_and_host(&host);

        let first_pass = marker(req.headers(), &X_REPLACED_HOST).is_none()
            || marker(req.headers(), &X_REPLACED_PATH).is_none();
        if first_pass {
            metrics::record_rewrite(!identifier.is_empty());
        }

        match marker(req.headers(), &X_REPLACED_HOST) {
            None => self.rewrite_host(req, &host, base_host)?,
            Some(replaced) => tracing::info!(replaced_host = %replaced, "Host already rewritten"),
        }

        let outcome = match marker(req.headers(), &X_REPLACED_PATH) {
            None => self.rewrite_path(req, identifier)?,
            Some(replaced) => {
                tracing::info!(replaced_path = %replaced, "Path already rewritten");
                RewriteOutcome {
                    base_path: self.reentered_base_path(req.headers(), identifier),
                    logical_path: self.logical_path(req.uri().path()),
                }
            }
        };

        Ok(outcome)
    }

    fn identifier_and_host<'h>(&self, host: &'h str) -> (&'h str, &'h str) {
        if !self.config.rewrite_subdomain {
            return ("", host);
        }

        let (identifier, base_host) = self.pattern.extract(host);
        if identifier.is_empty() {
            tracing::info!(host = %host, "No dynamic identifier found in host");
        } else {
            tracing::info!(identifier = %identifier, "Dynamic identifier");
        }
        (identifier, base_host)
    }

    fn rewrite_host<B>(
        &self,
        req: &mut Request<B>,
        original_host: &str,
        base_host: &str,
    ) -> Result<(), RewriteError> {
        let new_host = self.config.replacement_host.as_deref().unwrap_or(base_host);

        let new_value = HeaderValue::from_str(new_host)
            .map_err(|_| RewriteError::InvalidHeader(new_host.to_string()))?;
        let original_value = HeaderValue::from_str(original_host)
            .map_err(|_| RewriteError::InvalidHeader(original_host.to_string()))?;

        if req.uri().authority().is_some() {
            let authority = Authority::from_str(new_host)
                .map_err(|_| RewriteError::InvalidUri(new_host.to_string()))?;
            let mut parts = req.uri().clone().into_parts();
            parts.authority = Some(authority);
            *req.uri_mut() = Uri::from_parts(parts)
                .map_err(|_| RewriteError::InvalidUri(new_host.to_string()))?;
        }

        req.headers_mut().insert(HOST, new_value);
        req.headers_mut().append(X_REPLACED_HOST, original_value);

        tracing::info!(from = %original_host, to = %new_host, "Rewritten host");
        Ok(())
    }

    fn rewrite_path<B>(
        &self,
        req: &mut Request<B>,
        identifier: &str,
    ) -> Result<RewriteOutcome, RewriteError> {
        let original_path = req.uri().path().to_string();
        let base_path = self.base_path_for(identifier);

        let mut raw_path = base_path.clone();
        if self.config.keep_original_path {
            raw_path.push_str(&original_path);
        } else {
            raw_path.push('/');
        }

        let uri = with_path(req.uri(), &raw_path)?;
        let original_value = HeaderValue::from_str(&original_path)
            .map_err(|_| RewriteError::InvalidHeader(original_path.clone()))?;

        req.headers_mut().append(X_REPLACED_PATH, original_value);
        *req.uri_mut() = uri;

        let logical_path = self.logical_path(&raw_path);
        tracing::info!(from = %original_path, to = %logical_path, "Rewritten path");
        tracing::info!(url = %req.uri(), "Rewritten URL");

        Ok(RewriteOutcome {
            base_path,
            logical_path,
        })
    }

    fn base_path_for(&self, identifier: &str) -> String {
        if identifier.is_empty() {
            self.config.base_path.clone()
        } else {
            format!("{}/{}", self.config.base_path, identifier)
        }
    }

    /// Base path of a request whose path was rewritten by an earlier pass.
    /// The identifier comes from the host recorded by that pass.
    fn reentered_base_path(&self, headers: &HeaderMap, current_identifier: &str) -> String {
        let identifier = match marker(headers, &X_REPLACED_HOST) {
            Some(original_host) if self.config.rewrite_subdomain => {
                self.pattern.extract(original_host).0
            }
            Some(_) => "",
            None => current_identifier,
        };
        self.base_path_for(identifier)
    }

    /// Unescape `raw`; on failure log and keep the raw form.
    fn logical_path(&self, raw: &str) -> String {
        match unescape_path(raw) {
            Ok(path) => path,
            Err(e) => {
                tracing::error!(raw_path = %raw, error = %e, "Unable to unescape url raw path");
                raw.to_string()
            }
        }
    }
}

/// Host of the request: the `Host` header, else the URI authority.
pub fn request_host<B>(req: &Request<B>) -> &str {
    req.headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().authority().map(|a| a.as_str()))
        .unwrap_or("")
}

/// `uri` with its path replaced by `raw_path`, query preserved.
fn with_path(uri: &Uri, raw_path: &str) -> Result<Uri, RewriteError> {
    let target = match uri.query() {
        Some(query) => format!("{}?{}", raw_path, query),
        None => raw_path.to_string(),
    };

    let path_and_query = PathAndQuery::from_str(&target)
        .map_err(|_| RewriteError::InvalidUri(target.clone()))?;
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    Uri::from_parts(parts).map_err(|_| RewriteError::InvalidUri(target))
}
