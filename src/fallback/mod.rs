//! Fallback dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Rewritten Request + RewriteOutcome
//!     → dispatcher.rs (invoke next handler once)
//!     → captured.rs (buffer status, headers, body)
//!     → 404 and fallback allowed?
//!         yes → path.rs (fallback URL) → forwarder.rs (second request, streamed back)
//!         no  → captured response committed verbatim
//! ```

pub mod captured;
pub mod dispatcher;
pub mod forwarder;
pub mod path;

pub use captured::CapturedResponse;
pub use dispatcher::FallbackDispatcher;
pub use forwarder::{ForwardError, ForwardFuture, Forwarder, HttpForwarder};
