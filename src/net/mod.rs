//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → plain: axum::serve
//!     → TLS: tls.rs (rustls config) → axum-server acceptor
//!     → Transport extension tells the filter which one it was
//! ```

pub mod tls;

use axum::http::{uri::Scheme, Request};

/// How the request reached the listener.
///
/// Inserted as a request extension by the server; requests without it are
/// treated as plain unless their URI says `https`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Plain,
    Tls,
}

impl Transport {
    pub fn scheme(self) -> &'static str {
        match self {
            Transport::Plain => "http",
            Transport::Tls => "https",
        }
    }
}

/// Transport the request arrived over.
pub fn transport_of<B>(req: &Request<B>) -> Transport {
    let tls_extension = req.extensions().get::<Transport>() == Some(&Transport::Tls);
    if tls_extension || req.uri().scheme() == Some(&Scheme::HTTPS) {
        Transport::Tls
    } else {
        Transport::Plain
    }
}
