//! Toy backend for trying the proxy by hand.
//!
//! Serves `/<tenant>/index.html` and `/<tenant>/default` for any tenant, echoes
//! host and path on `/<tenant>/echo/...`, and answers 404 for everything else.
//!
//! ```text
//! cargo run --example tenant_backend
//! cargo run -- --config proxy.toml   # upstream.address = "127.0.0.1:3000"
//! curl -H 'Host: acme.localhost' http://127.0.0.1:8080/missing
//! ```

use axum::{
    http::{header::HOST, HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use std::net::SocketAddr;

async fn serve(headers: HeaderMap, uri: Uri) -> impl IntoResponse {
    let host = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-");
    let segments: Vec<&str> = uri.path().trim_start_matches('/').split('/').collect();

    match segments.as_slice() {
        [tenant, "index.html"] => (
            StatusCode::OK,
            format!("<h1>{} index</h1>\n", tenant),
        ),
        [tenant, "default"] => (StatusCode::OK, format!("{} default page\n", tenant)),
        [_, "echo", ..] => (
            StatusCode::OK,
            format!("host={} path={}\n", host, uri),
        ),
        _ => (StatusCode::NOT_FOUND, format!("not found: {}\n", uri.path())),
    }
}

#[tokio::main]
async fn main() {
    let app = Router::new().fallback(serve);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    println!("Tenant backend is listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
