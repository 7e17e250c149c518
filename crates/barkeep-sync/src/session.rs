//! Session context and the capability-gated notification center.
//!
//! The admin-only behavior is resolved once at construction: admin
//! sessions get a live center over a synchronizer and feed subscription,
//! everyone else gets a structural no-op that never touches the store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::warn;
use uuid::Uuid;

use barkeep_core::config::realtime::RealtimeConfig;
use barkeep_core::result::AppResult;
use barkeep_entity::notification::Notification;
use barkeep_entity::user::StaffRole;
use barkeep_store::{ChangeFeed, NotificationStore};

use crate::alert::AlertSink;
use crate::synchronizer::NotificationSynchronizer;

/// Identity and capability of the logged-in staff member.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Login name.
    pub username: String,
    /// The staff member's role.
    pub role: StaffRole,
}

impl SessionContext {
    /// Create a session context.
    pub fn new(username: impl Into<String>, role: StaffRole) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    /// Whether this session carries the admin capability.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// The notification surface a session sees.
///
/// One implementation per capability: [`AdminCenter`] for admins,
/// [`NoopCenter`] for everyone else.
#[async_trait]
pub trait NotificationCenter: Send + Sync + std::fmt::Debug + 'static {
    /// Load the latest notifications into the projection.
    async fn fetch_initial(&self) -> AppResult<()>;

    /// Current projection, newest first.
    async fn notifications(&self) -> Vec<Notification>;

    /// Current unread count.
    async fn unread_count(&self) -> usize;

    /// Optimistically acknowledge one notification.
    async fn mark_as_read(&self, id: Uuid);

    /// Optimistically acknowledge everything.
    async fn mark_all_as_read(&self);

    /// Release the feed subscription. Must be called when the session
    /// ends; a live subscription past teardown is a resource leak.
    fn teardown(&self);
}

/// Live notification center for an admin session.
///
/// Holds the synchronizer and the shutdown handle for its feed task. The
/// task drops the feed receiver on shutdown, releasing the subscription.
#[derive(Debug)]
pub struct AdminCenter {
    sync: Arc<NotificationSynchronizer>,
    shutdown: watch::Sender<bool>,
}

impl AdminCenter {
    /// Subscribe to the change feed and start the feed task.
    pub async fn start(
        store: Arc<dyn NotificationStore>,
        feed: Arc<dyn ChangeFeed>,
        alerts: Arc<dyn AlertSink>,
        config: &RealtimeConfig,
    ) -> AppResult<Self> {
        let sync = Arc::new(NotificationSynchronizer::new(
            store,
            alerts,
            StaffRole::Admin,
            config,
        ));
        let events = feed.subscribe(StaffRole::Admin).await?;
        let (shutdown, shutdown_rx) = watch::channel(false);
        tokio::spawn(Arc::clone(&sync).run(events, shutdown_rx));
        Ok(Self { sync, shutdown })
    }
}

#[async_trait]
impl NotificationCenter for AdminCenter {
    async fn fetch_initial(&self) -> AppResult<()> {
        self.sync.fetch_initial().await
    }

    async fn notifications(&self) -> Vec<Notification> {
        self.sync.snapshot().await
    }

    async fn unread_count(&self) -> usize {
        self.sync.unread_count().await
    }

    async fn mark_as_read(&self, id: Uuid) {
        self.sync.mark_as_read(id).await
    }

    async fn mark_all_as_read(&self) {
        self.sync.mark_all_as_read().await
    }

    fn teardown(&self) {
        if self.shutdown.send(true).is_err() {
            warn!("Notification feed task already gone at teardown");
        }
    }
}

impl Drop for AdminCenter {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

/// No-op center for non-admin sessions. Performs no store access.
#[derive(Debug, Clone, Default)]
pub struct NoopCenter;

#[async_trait]
impl NotificationCenter for NoopCenter {
    async fn fetch_initial(&self) -> AppResult<()> {
        Ok(())
    }

    async fn notifications(&self) -> Vec<Notification> {
        Vec::new()
    }

    async fn unread_count(&self) -> usize {
        0
    }

    async fn mark_as_read(&self, _id: Uuid) {}

    async fn mark_all_as_read(&self) {}

    fn teardown(&self) {}
}

/// Build the notification center for a session.
///
/// The capability check happens exactly once, here; the no-op path for
/// non-admins is enforced by the returned type, not by scattered checks.
pub async fn center_for_session(
    ctx: &SessionContext,
    store: Arc<dyn NotificationStore>,
    feed: Arc<dyn ChangeFeed>,
    alerts: Arc<dyn AlertSink>,
    config: &RealtimeConfig,
) -> AppResult<Arc<dyn NotificationCenter>> {
    if ctx.is_admin() {
        let center = AdminCenter::start(store, feed, alerts, config).await?;
        Ok(Arc::new(center))
    } else {
        Ok(Arc::new(NoopCenter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use barkeep_entity::notification::NotificationKind;
    use barkeep_store::memory::MemoryStore;
    use barkeep_store::NewNotification;

    use crate::alert::TracingAlertSink;

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    fn new_notification() -> NewNotification {
        NewNotification {
            title: "Inventory due".into(),
            message: "Monthly count tonight".into(),
            kind: NotificationKind::Info,
            recipient_role: StaffRole::Admin,
        }
    }

    #[tokio::test]
    async fn test_non_admin_gets_noop_center() {
        let store = Arc::new(MemoryStore::new(16));
        store.insert(new_notification()).await.unwrap();

        let ctx = SessionContext::new("marco", StaffRole::Bartender);
        let center = center_for_session(
            &ctx,
            Arc::clone(&store) as _,
            Arc::clone(&store) as _,
            Arc::new(TracingAlertSink),
            &RealtimeConfig::default(),
        )
        .await
        .unwrap();

        center.fetch_initial().await.unwrap();
        assert!(center.notifications().await.is_empty());
        assert_eq!(center.unread_count().await, 0);
        // Acknowledgements never reach the store.
        center.mark_all_as_read().await;
        settle().await;
        assert_eq!(store.write_calls(), 0);
    }

    #[tokio::test]
    async fn test_admin_center_sees_live_inserts() {
        let store = Arc::new(MemoryStore::new(16));
        let ctx = SessionContext::new("ana", StaffRole::Admin);
        let center = center_for_session(
            &ctx,
            Arc::clone(&store) as _,
            Arc::clone(&store) as _,
            Arc::new(TracingAlertSink),
            &RealtimeConfig::default(),
        )
        .await
        .unwrap();

        center.fetch_initial().await.unwrap();
        store.insert(new_notification()).await.unwrap();
        settle().await;

        assert_eq!(center.notifications().await.len(), 1);
        assert_eq!(center.unread_count().await, 1);
        center.teardown();
    }

    #[tokio::test]
    async fn test_teardown_releases_subscription() {
        let store = Arc::new(MemoryStore::new(16));
        let ctx = SessionContext::new("ana", StaffRole::Admin);
        let center = center_for_session(
            &ctx,
            Arc::clone(&store) as _,
            Arc::clone(&store) as _,
            Arc::new(TracingAlertSink),
            &RealtimeConfig::default(),
        )
        .await
        .unwrap();

        center.teardown();
        settle().await;

        // Inserts after teardown are not applied.
        store.insert(new_notification()).await.unwrap();
        settle().await;
        assert!(center.notifications().await.is_empty());
    }
}
