//! The notification synchronizer.
//!
//! Owns one session's projection and keeps it consistent with the store:
//! a replacing initial fetch, live insert events applied as they arrive,
//! and optimistic read acknowledgements whose store writes are issued in
//! the background and never awaited by the caller.

use std::sync::Arc;

use tokio::sync::{broadcast, watch, Mutex};
use tracing::{debug, warn};
use uuid::Uuid;

use barkeep_core::config::realtime::RealtimeConfig;
use barkeep_core::result::AppResult;
use barkeep_entity::notification::Notification;
use barkeep_entity::user::StaffRole;
use barkeep_store::NotificationStore;

use crate::alert::AlertSink;
use crate::projection::NotificationProjection;

/// Per-session synchronizer between the store and a local projection.
#[derive(Debug)]
pub struct NotificationSynchronizer {
    store: Arc<dyn NotificationStore>,
    alerts: Arc<dyn AlertSink>,
    role: StaffRole,
    initial_fetch_limit: u32,
    projection: Mutex<NotificationProjection>,
}

impl NotificationSynchronizer {
    /// Create a synchronizer for a role over a store and an alert sink.
    pub fn new(
        store: Arc<dyn NotificationStore>,
        alerts: Arc<dyn AlertSink>,
        role: StaffRole,
        config: &RealtimeConfig,
    ) -> Self {
        Self {
            store,
            alerts,
            role,
            initial_fetch_limit: config.initial_fetch_limit,
            projection: Mutex::new(NotificationProjection::new(config.projection_cap)),
        }
    }

    /// Replace the projection with the latest rows from the store.
    ///
    /// On a store failure the projection keeps its previous state (empty
    /// on first load) and the error is returned for the caller to log.
    pub async fn fetch_initial(&self) -> AppResult<()> {
        let rows = self
            .store
            .fetch_latest(self.role, self.initial_fetch_limit)
            .await?;
        let mut projection = self.projection.lock().await;
        projection.replace(rows);
        debug!(
            role = %self.role,
            entries = projection.len(),
            unread = projection.unread_count(),
            "Initial notification fetch"
        );
        Ok(())
    }

    /// Apply a live insert event and emit the alert cue.
    ///
    /// Duplicate events (already-seen ids) are dropped. A cue failure is
    /// logged and never interrupts event handling.
    pub async fn handle_insert(&self, row: Notification) {
        let inserted = self.projection.lock().await.apply_insert(row.clone());
        if !inserted {
            debug!(id = %row.id, "Dropped duplicate insert event");
            return;
        }
        if let Err(e) = self.alerts.play_cue(&row).await {
            warn!(id = %row.id, "Alert cue failed: {}", e);
        }
    }

    /// Optimistically mark one notification read.
    ///
    /// The local mutation is applied immediately; the store update is
    /// issued in the background and its outcome only logged. Divergence
    /// from a failed write heals on the next [`fetch_initial`].
    ///
    /// [`fetch_initial`]: NotificationSynchronizer::fetch_initial
    pub async fn mark_as_read(&self, id: Uuid) {
        self.projection.lock().await.mark_read(id);

        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(e) = store.mark_read(id).await {
                warn!(%id, "Background mark-read write failed: {}", e);
            }
        });
    }

    /// Optimistically mark every notification read.
    ///
    /// The id set is computed from the local projection before mutation
    /// and sent to the store as one batched update.
    pub async fn mark_all_as_read(&self) {
        let ids = self.projection.lock().await.mark_all_read();
        if ids.is_empty() {
            return;
        }

        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            match store.mark_read_many(&ids).await {
                Ok(affected) => debug!(requested = ids.len(), affected, "Marked all read"),
                Err(e) => warn!(count = ids.len(), "Background mark-all write failed: {}", e),
            }
        });
    }

    /// Snapshot of the projection, newest first.
    pub async fn snapshot(&self) -> Vec<Notification> {
        self.projection.lock().await.entries().to_vec()
    }

    /// Current unread count.
    pub async fn unread_count(&self) -> usize {
        self.projection.lock().await.unread_count()
    }

    /// Consume a change-feed subscription until shutdown.
    ///
    /// Returning drops the receiver, which releases the subscription. A
    /// lagged receiver skips the missed events and keeps going; the gap
    /// heals on the next initial fetch.
    pub async fn run(
        self: Arc<Self>,
        mut events: broadcast::Receiver<Notification>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        debug!(role = %self.role, "Notification feed task shutting down");
                        break;
                    }
                }
                event = events.recv() => match event {
                    Ok(row) => self.handle_insert(row).await,
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "Notification feed lagged, events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!(role = %self.role, "Notification feed closed");
                        break;
                    }
                },
            }
        }
    }
}
