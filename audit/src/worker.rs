//! Drains the audit queue into storage and the admin feed.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use evote_store::AuditStore;
use evote_types::AuditEvent;

use crate::AdminFeed;

pub struct AuditWorker<S: ?Sized> {
    rx: mpsc::Receiver<AuditEvent>,
    store: Arc<S>,
    feed: Option<AdminFeed>,
}

impl<S> AuditWorker<S>
where
    S: AuditStore + Send + Sync + ?Sized + 'static,
{
    pub fn new(rx: mpsc::Receiver<AuditEvent>, store: Arc<S>, feed: Option<AdminFeed>) -> Self {
        Self { rx, store, feed }
    }

    /// Run until every sender is gone or shutdown is signalled. On shutdown,
    /// events already queued are still written.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        loop {
            tokio::select! {
                maybe = self.rx.recv() => match maybe {
                    Some(event) => self.handle(event).await,
                    None => break,
                },
                _ = shutdown.recv() => {
                    self.rx.close();
                    while let Some(event) = self.rx.recv().await {
                        self.handle(event).await;
                    }
                    break;
                }
            }
        }
        tracing::debug!("audit worker stopped");
    }

    async fn handle(&self, event: AuditEvent) {
        if let Some(feed) = &self.feed {
            feed.publish(&event);
        }

        let store = Arc::clone(&self.store);
        let action = event.action.clone();
        match tokio::task::spawn_blocking(move || store.append_audit(&event)).await {
            Ok(Ok(seq)) => tracing::trace!(seq, action = %action, "audit event stored"),
            Ok(Err(e)) => tracing::warn!(action = %action, error = %e, "failed to store audit event"),
            Err(e) => tracing::warn!(action = %action, error = %e, "audit store task failed"),
        }
    }
}
