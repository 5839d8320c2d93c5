//! Rewrite engine subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (Host, path, marker headers)
//!     → identifier.rs (split host into identifier + base host)
//!     → engine.rs (host rewrite, path rewrite, marker headers)
//!     → escape.rs (escaped path → logical path)
//!     → RewriteOutcome handed to the fallback dispatcher
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - Marker headers make a second pass a no-op
//! - Unescape failures are logged, never fatal

pub mod engine;
pub mod escape;
pub mod identifier;
pub mod markers;
pub mod rules;

pub use engine::{request_host, RewriteEngine, RewriteError, RewriteOutcome};
pub use identifier::IdentifierPattern;
pub use markers::{X_FALLBACK_FOR, X_REPLACED_HOST, X_REPLACED_PATH};
pub use rules::RewriteConfig;
