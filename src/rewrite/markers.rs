//! Marker headers shared between passes of the filter.
//!
//! Their presence tells a later pass (a retry, or the fallback request
//! coming back through the proxy over the network) that a step already ran.

use axum::http::{HeaderMap, HeaderName};

/// Path the request carried before the path rewrite.
pub const X_REPLACED_PATH: HeaderName = HeaderName::from_static("x-replaced-path");

/// Host the request carried before the host rewrite.
pub const X_REPLACED_HOST: HeaderName = HeaderName::from_static("x-replaced-host");

/// Set on fallback requests to the URL of the request that triggered them.
pub const X_FALLBACK_FOR: HeaderName = HeaderName::from_static("x-fallback-for");

/// First value of a marker header, treating an empty value as absent.
pub fn marker<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}
