//! Shutdown coordination for the invoke server.

use tokio::sync::broadcast;

use crate::lifecycle::signals::wait_for_signal;

/// Coordinator for graceful shutdown.
///
/// Cloning yields another handle to the same channel.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Wake every subscriber.
    pub fn trigger(&self) {
        let notified = self.tx.send(()).unwrap_or(0);
        tracing::debug!(subscribers = notified, "Shutdown triggered");
    }

    /// Trigger shutdown when the process receives SIGINT or SIGTERM.
    pub fn trigger_on_signal(&self) {
        let shutdown = self.clone();
        tokio::spawn(async move {
            wait_for_signal().await;
            shutdown.trigger();
        });
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
