//! Subdomain rewrite filter.
//!
//! Derives a target host and path prefix from the leftmost label of the
//! request `Host`, rewrites the request, hands it to the next handler and,
//! when that handler answers 404, retries once against a configured fallback
//! path.

pub mod config;
pub mod fallback;
pub mod filter;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod rewrite;

pub use config::schema::ProxyConfig;
pub use filter::RewriteFilter;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
