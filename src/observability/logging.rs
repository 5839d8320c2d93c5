//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` overrides the configured level when set
//! - Each filter instance logs inside its own span, handed to it at construction

use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogLevel;

/// Install the global subscriber. Call once, from the binary.
pub fn init_logging(level: LogLevel) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},tower_http=info", level.directive()).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Span every log event of one filter instance is recorded in.
pub fn filter_span(name: &str) -> Span {
    tracing::info_span!("subdomain_rewrite", filter = %name)
}
