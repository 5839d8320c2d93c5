//! Fallback dispatch.
//!
//! # Responsibilities
//! - Invoke the next handler once, capturing its response
//! - Decide whether the configured fallback applies
//! - Forward at most one fallback request, guarded against loops
//!
//! # Design Decisions
//! - Request body buffered up front so the fallback can replay it
//! - No buffering at all when no fallback is configured
//! - The loop guard relies on `X-Fallback-For` and on the request already
//!   addressing the fallback target; both survive a network hop

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{Instrument, Span};
use url::Url;

use super::captured::CapturedResponse;
use super::forwarder::Forwarder;
use super::path::{fallback_path, origin, url_on};
use crate::config::LimitsConfig;
use crate::net::transport_of;
use crate::observability::metrics;
use crate::rewrite::markers::{marker, X_FALLBACK_FOR};
use crate::rewrite::{request_host, RewriteOutcome};

/// Runs the next handler and serves the fallback when it answers 404.
pub struct FallbackDispatcher {
    fallback_path: Option<String>,
    forwarder: Arc<dyn Forwarder>,
    max_request_body: usize,
    max_response_body: usize,
    span: Span,
}

impl FallbackDispatcher {
    pub fn new(
        fallback_path: Option<String>,
        forwarder: Arc<dyn Forwarder>,
        limits: &LimitsConfig,
        span: Span,
    ) -> Self {
        Self {
            fallback_path,
            forwarder,
            max_request_body: limits.max_request_body,
            max_response_body: limits.max_response_body,
            span,
        }
    }

    /// Hand `request` to `next` and produce the response for the client.
    ///
    /// `next` runs exactly once. The forwarder runs at most once, only for a
    /// 404 that is not itself the answer to this fallback.
    pub async fn dispatch<F, Fut>(
        &self,
        request: Request<Body>,
        outcome: &RewriteOutcome,
        next: F,
    ) -> Response
    where
        F: FnOnce(Request<Body>) -> Fut,
        Fut: Future<Output = Response>,
    {
        let start = Instant::now();
        let (label, response) = self
            .dispatch_inner(request, outcome, next)
            .instrument(self.span.clone())
            .await;
        metrics::record_dispatch(label, response.status().as_u16(), start);
        response
    }

    async fn dispatch_inner<F, Fut>(
        &self,
        request: Request<Body>,
        outcome: &RewriteOutcome,
        next: F,
    ) -> (&'static str, Response)
    where
        F: FnOnce(Request<Body>) -> Fut,
        Fut: Future<Output = Response>,
    {
        let Some(target) = self.fallback_path.as_deref() else {
            return ("passthrough", next(request).await);
        };

        let scheme = transport_of(&request).scheme();
        let host = request_host(&request).to_string();
        let query = request.uri().query().map(str::to_string);
        let already_tried = marker(request.headers(), &X_FALLBACK_FOR).map(str::to_string);

        let (parts, body) = request.into_parts();
        let body = match axum::body::to_bytes(body, self.max_request_body).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, limit = self.max_request_body, "Unable to buffer request body");
                return (
                    "rejected",
                    (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response(),
                );
            }
        };
        let method = parts.method.clone();
        let headers = parts.headers.clone();

        let response = next(Request::from_parts(parts, Body::from(body.clone()))).await;
        let captured = match CapturedResponse::capture(response, self.max_response_body).await {
            Ok(captured) => captured,
            Err(e) => {
                tracing::error!(error = %e, "Unable to capture downstream response");
                return (
                    "error",
                    (StatusCode::BAD_GATEWAY, "Upstream response unreadable").into_response(),
                );
            }
        };
        tracing::info!(status = captured.status.as_u16(), "Response status code");

        if !captured.is_not_found() {
            return ("captured", captured.into_response());
        }

        let origin = match origin(scheme, &host) {
            Ok(origin) => origin,
            Err(e) => {
                tracing::warn!(host = %host, error = %e, "Unable to build fallback URL");
                return ("captured", captured.into_response());
            }
        };
        let fallback_url = url_on(
            &origin,
            &fallback_path(target, &outcome.logical_path, &outcome.base_path),
            None,
        );
        let current_url = url_on(&origin, &outcome.logical_path, None);

        if !should_use_fallback(captured.status, &fallback_url, &current_url, already_tried.as_deref()) {
            tracing::info!(url = %fallback_url, "Fallback already attempted");
            return ("captured", captured.into_response());
        }

        let request_url = url_on(&origin, &outcome.logical_path, query.as_deref());
        let fallback_request = match build_fallback_request(method, headers, body, &fallback_url, &request_url) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(url = %fallback_url, error = %e, "Unable to build fallback request");
                return ("captured", captured.into_response());
            }
        };

        tracing::info!(url = %fallback_url, "Fetching fallback content");
        match self.forwarder.forward(fallback_request).await {
            Ok(response) => {
                metrics::record_fallback("forwarded");
                ("fallback", response)
            }
            Err(e) => {
                tracing::error!(url = %fallback_url, error = %e, "Fallback forward failed");
                metrics::record_fallback("failed");
                ("fallback", (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response())
            }
        }
    }
}

/// Fallback applies to a 404 unless this fallback was already attempted:
/// either the marker names it, or the request itself is the fallback target.
pub fn should_use_fallback(
    status: StatusCode,
    fallback_url: &Url,
    current_url: &Url,
    already_tried: Option<&str>,
) -> bool {
    status == StatusCode::NOT_FOUND
        && already_tried != Some(fallback_url.as_str())
        && current_url != fallback_url
}

fn build_fallback_request(
    method: axum::http::Method,
    headers: axum::http::HeaderMap,
    body: Bytes,
    fallback_url: &Url,
    request_url: &Url,
) -> Result<Request<Bytes>, axum::http::Error> {
    let marker = HeaderValue::from_str(request_url.as_str())?;
    let mut request = Request::builder()
        .method(method)
        .uri(fallback_url.as_str())
        .body(body)?;
    *request.headers_mut() = headers;
    request.headers_mut().insert(X_FALLBACK_FOR, marker);
    Ok(request)
}
