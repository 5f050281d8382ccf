//! Shutdown coordination for the server.
//!
//! # Design Decisions
//! - Backed by a `watch` channel holding a single flag, so a task that
//!   subscribes after the trigger still observes it
//! - Triggering is idempotent; only the first call is logged

use std::sync::Arc;

use tokio::sync::watch;

/// Coordinator for graceful shutdown. Clones trigger the same signal.
#[derive(Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// A signal that resolves once shutdown is triggered.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let already = self.tx.send_replace(true);
        if !already {
            tracing::info!(subscribers = self.tx.receiver_count(), "Shutdown triggered");
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half handed to long-running tasks.
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Wait for the trigger. Also resolves if every `Shutdown` handle is gone.
    pub async fn recv(&mut self) {
        let _ = self.rx.wait_for(|triggered| *triggered).await;
    }
}
