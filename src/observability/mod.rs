//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! rewrite / fallback produce:
//!     → logging.rs (structured log events inside the filter's span)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - The subscriber is installed once by the binary; library code only emits
//! - Request ID (`x-request-id`) is attached by tower-http and shows up in spans
//! - Metrics are cheap (atomic increments) and no-ops without a recorder

pub mod logging;
pub mod metrics;
