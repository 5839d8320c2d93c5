//! Shutdown coordination between the signal task and the server.

use tokio::sync::broadcast;

/// Broadcast handle that stops every server started from it.
///
/// The server selects on its receiver. Plain HTTP stops accepting and drains;
/// TLS gets a bounded drain through the axum-server handle.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver to hand to [`crate::http::HttpServer::run`].
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the signal. Firing twice, or with no server listening, is harmless.
    pub fn trigger(&self) {
        if self.tx.send(()).is_ok() {
            tracing::info!(servers = self.tx.receiver_count(), "Draining servers");
        }
    }

    /// Servers still holding a receiver.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
