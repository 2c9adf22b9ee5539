//! Shutdown coordination between the signal task and the HTTP server.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::lifecycle::signals;

/// One-shot broadcast of "stop accepting requests".
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Broadcast the stop. Subscribers created later do not see it.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Hand the coordinator to a task that triggers it on Ctrl-C or SIGTERM.
    pub fn trigger_on_signal(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            signals::wait_for_shutdown().await;
            self.trigger();
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once shutdown is triggered, or once the coordinator is gone.
pub async fn requested(mut rx: broadcast::Receiver<()>) {
    match rx.recv().await {
        Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
            tracing::info!("Shutdown signal received")
        }
        Err(broadcast::error::RecvError::Closed) => {
            tracing::info!("Shutdown coordinator dropped, stopping")
        }
    }
}
