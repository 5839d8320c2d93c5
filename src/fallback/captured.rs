//! In-memory response recorder.
//!
//! The downstream response lands here first so its status can be inspected
//! before anything reaches the client. Status and headers cannot be taken
//! back once flushed to a real connection.

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, StatusCode, Version},
    response::Response,
};

/// Fully buffered downstream response.
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    pub status: StatusCode,
    pub version: Version,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CapturedResponse {
    /// Drain `response` into memory, failing when the body errors or exceeds `limit` bytes.
    pub async fn capture(response: Response, limit: usize) -> Result<Self, axum::Error> {
        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(body, limit).await?;
        Ok(Self {
            status: parts.status,
            version: parts.version,
            headers: parts.headers,
            body,
        })
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    /// Commit the captured response as is.
    pub fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.version_mut() = self.version;
        *response.headers_mut() = self.headers;
        response
    }
}
