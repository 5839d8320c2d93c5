//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the upstream handler as catch-all
//! - Wire up middleware (rewrite filter, tracing, timeout, request ID)
//! - Serve plain HTTP or TLS on the given listener
//! - Stop gracefully on the shutdown signal

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Extension, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::fallback::{Forwarder, HttpForwarder};
use crate::filter::RewriteFilter;
use crate::http::middleware::subdomain_rewrite;
use crate::http::upstream::{self, UpstreamState};
use crate::net::{tls::load_tls_config, Transport};
use crate::rewrite::{RewriteConfig, RewriteError};

/// Name the filter instance logs under.
const FILTER_NAME: &str = "subdomain-rewrite";

/// How long in-flight TLS connections may drain after shutdown.
const TLS_DRAIN: Duration = Duration::from_secs(10);

/// Errors building the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    #[error("fallback client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("upstream address '{0}' is invalid")]
    Upstream(String),
}

/// HTTP server for the rewriting proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let forwarder = Arc::new(HttpForwarder::new()?);
        Self::with_forwarder(config, forwarder)
    }

    /// Create a server whose fallback requests go through `forwarder`.
    pub fn with_forwarder(
        config: ProxyConfig,
        forwarder: Arc<dyn Forwarder>,
    ) -> Result<Self, ServerError> {
        let upstream = UpstreamState::new(&config.upstream.address)
            .map_err(|_| ServerError::Upstream(config.upstream.address.clone()))?;

        let filter = Arc::new(RewriteFilter::new(
            FILTER_NAME,
            RewriteConfig::from_settings(&config.rewrite),
            &config.limits,
            forwarder,
        )?);

        let router = Self::build_router(&config, filter, upstream);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, filter: Arc<RewriteFilter>, upstream: UpstreamState) -> Router {
        let transport = if config.listener.tls.is_some() {
            Transport::Tls
        } else {
            Transport::Plain
        };

        Router::new()
            .fallback(upstream::forward)
            .with_state(upstream)
            .layer(middleware::from_fn_with_state(filter, subdomain_rewrite))
            .layer(Extension(transport))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let HttpServer { router, config } = self;

        match &config.listener.tls {
            None => {
                tracing::info!(address = %addr, "HTTP server starting");
                axum::serve(listener, router.into_make_service())
                    .with_graceful_shutdown(async move {
                        let _ = shutdown.recv().await;
                    })
                    .await?;
            }
            Some(tls) => {
                let rustls = load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path)).await?;
                tracing::info!(address = %addr, "HTTPS server starting");

                let handle = axum_server::Handle::new();
                let shutdown_handle = handle.clone();
                tokio::spawn(async move {
                    let _ = shutdown.recv().await;
                    shutdown_handle.graceful_shutdown(Some(TLS_DRAIN));
                });

                axum_server::from_tcp_rustls(listener.into_std()?, rustls)
                    .handle(handle)
                    .serve(router.into_make_service())
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn test_invalid_upstream_rejected() {
        let mut config = ProxyConfig::default();
        config.upstream.address = "bad upstream".into();
        assert!(matches!(HttpServer::new(config), Err(ServerError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = ProxyConfig::default();
        config.upstream.address = addr.to_string();
        let server = HttpServer::new(config).unwrap();

        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .uri("/users")
                    .header("host", "tenant1.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(response.headers().contains_key("x-request-id"));
    }
}
