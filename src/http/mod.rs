//! HTTP server subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → middleware.rs (rewrite filter: rewrite → dispatch → fallback)
//!     → upstream.rs (next handler: relay to backend service)
//!     → Send to client
//! ```

pub mod headers;
pub mod middleware;
pub mod server;
pub mod upstream;

pub use server::{HttpServer, ServerError};
