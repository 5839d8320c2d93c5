//! Axum middleware running the rewrite filter in front of the next handler.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::filter::RewriteFilter;

/// `middleware::from_fn_with_state` entry point.
pub async fn subdomain_rewrite(
    State(filter): State<Arc<RewriteFilter>>,
    request: Request,
    next: Next,
) -> Response {
    filter.handle(request, |request| next.run(request)).await
}
