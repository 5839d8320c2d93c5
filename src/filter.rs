//! The rewrite filter: rewrite engine followed by fallback dispatch.

use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};

use crate::config::LimitsConfig;
use crate::fallback::{FallbackDispatcher, Forwarder};
use crate::observability::logging::filter_span;
use crate::rewrite::{RewriteConfig, RewriteEngine, RewriteError};

/// One configured instance of the subdomain rewrite filter.
///
/// Immutable after construction and shared by all in-flight requests.
pub struct RewriteFilter {
    name: String,
    engine: RewriteEngine,
    dispatcher: FallbackDispatcher,
}

impl RewriteFilter {
    /// Build a filter. Fails only if the identifier pattern does not compile.
    pub fn new(
        name: &str,
        config: RewriteConfig,
        limits: &LimitsConfig,
        forwarder: Arc<dyn Forwarder>,
    ) -> Result<Self, RewriteError> {
        let span = filter_span(name);
        let fallback_path = config.fallback_path.clone();
        let engine = RewriteEngine::new(config, span.clone())?;
        let dispatcher = FallbackDispatcher::new(fallback_path, forwarder, limits, span);

        tracing::info!(
            filter = %name,
            rewrite_subdomain = engine.config().rewrite_subdomain,
            base_path = %engine.config().base_path,
            keep_path = engine.config().keep_original_path,
            replacement_host = ?engine.config().replacement_host,
            fallback_path = ?engine.config().fallback_path,
            "Rewrite filter configured"
        );

        Ok(Self {
            name: name.to_string(),
            engine,
            dispatcher,
        })
    }

    /// Rewrite `request`, run `next`, and apply the fallback when needed.
    pub async fn handle<F, Fut>(&self, mut request: Request<Body>, next: F) -> Response
    where
        F: FnOnce(Request<Body>) -> Fut,
        Fut: Future<Output = Response>,
    {
        let outcome = match self.engine.rewrite(&mut request) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(filter = %self.name, error = %e, "Request cannot be rewritten");
                return (StatusCode::BAD_REQUEST, "Invalid request target").into_response();
            }
        };

        self.dispatcher.dispatch(request, &outcome, next).await
    }
}
