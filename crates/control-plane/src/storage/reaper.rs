// Background purge of expired token records
//
// Expired tokens are already rejected by the codec; the sweep only keeps the
// token table from growing without bound.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use wellness_core::AuthService;

/// Handle to a running reaper. Dropping it stops the task.
pub struct TokenReaper {
    shutdown_tx: watch::Sender<()>,
    handle: JoinHandle<()>,
}

impl TokenReaper {
    /// Spawn a task that purges expired tokens every `interval`.
    pub fn spawn(service: Arc<AuthService>, interval: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(());

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; consume it so we start
            // with a full interval wait.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => {
                        tracing::info!("Token reaper shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        match service.purge_expired_tokens().await {
                            Ok(0) => {}
                            Ok(removed) => tracing::debug!(removed, "Purged expired tokens"),
                            Err(e) => tracing::warn!(error = %e, "Token purge failed"),
                        }
                    }
                }
            }
        });

        Self {
            shutdown_tx,
            handle,
        }
    }

    /// Signal the task to stop and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.handle.await;
    }
}
