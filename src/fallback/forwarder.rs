//! Pass-through forwarding of fallback requests.

use axum::{
    body::{Body, Bytes},
    http::{header, Request},
    response::Response,
};
use futures_util::future::BoxFuture;
use reqwest::redirect::Policy;
use thiserror::Error;

use crate::http::headers::strip_hop_by_hop;

/// Errors from forwarding a fallback request.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid fallback request: {0}")]
    Build(String),

    #[error("fallback transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type ForwardFuture = BoxFuture<'static, Result<Response, ForwardError>>;

/// Sends a fully built request to the absolute URL in its URI and streams
/// the answer back.
pub trait Forwarder: Send + Sync + 'static {
    fn forward(&self, request: Request<Bytes>) -> ForwardFuture;
}

/// HTTP(S) forwarder backed by `reqwest`.
///
/// Redirects are handed back to the client rather than followed.
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    client: reqwest::Client,
}

impl HttpForwarder {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .no_proxy()
            .build()?;
        Ok(Self { client })
    }
}

impl Forwarder for HttpForwarder {
    fn forward(&self, request: Request<Bytes>) -> ForwardFuture {
        let client = self.client.clone();
        Box::pin(async move {
            let (parts, body) = request.into_parts();
            let url = reqwest::Url::parse(&parts.uri.to_string())
                .map_err(|e| ForwardError::Build(e.to_string()))?;

            let mut headers = parts.headers;
            strip_hop_by_hop(&mut headers);
            headers.remove(header::HOST);
            headers.remove(header::CONTENT_LENGTH);

            let upstream = client
                .request(parts.method, url)
                .headers(headers)
                .body(body)
                .send()
                .await?;

            let status = upstream.status();
            let version = upstream.version();
            let mut headers = upstream.headers().clone();
            strip_hop_by_hop(&mut headers);

            let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
            *response.status_mut() = status;
            *response.version_mut() = version;
            *response.headers_mut() = headers;
            Ok(response)
        })
    }
}
