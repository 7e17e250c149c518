//! In-process fan-out of insert events, keyed by recipient role.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tokio::sync::broadcast;

use barkeep_entity::notification::Notification;
use barkeep_entity::user::StaffRole;

/// Broadcast fan-out of notification inserts.
#[derive(Debug)]
pub struct RoleFanout {
    /// Recipient role → broadcast sender
    channels: RwLock<HashMap<StaffRole, broadcast::Sender<Notification>>>,
    /// Buffer size for channels
    buffer_size: usize,
}

impl RoleFanout {
    /// Create a new fan-out
    pub fn new(buffer_size: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            buffer_size,
        }
    }

    /// Publish an insert event to the role's channel
    pub async fn publish(&self, notification: Notification) {
        let channels = self.channels.read().await;
        if let Some(tx) = channels.get(&notification.recipient_role) {
            let _ = tx.send(notification);
        }
    }

    /// Subscribe to a role's channel, returns a receiver
    pub async fn subscribe(&self, role: StaffRole) -> broadcast::Receiver<Notification> {
        let mut channels = self.channels.write().await;
        let tx = channels
            .entry(role)
            .or_insert_with(|| broadcast::channel(self.buffer_size).0);
        tx.subscribe()
    }

    /// Number of live subscribers for a role.
    pub async fn subscriber_count(&self, role: StaffRole) -> usize {
        let channels = self.channels.read().await;
        channels.get(&role).map(|tx| tx.receiver_count()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barkeep_entity::notification::NotificationKind;
    use chrono::Utc;
    use uuid::Uuid;

    fn notification(role: StaffRole) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            title: "t".into(),
            message: "m".into(),
            kind: NotificationKind::Info,
            read: false,
            created_at: Utc::now(),
            recipient_role: role,
        }
    }

    #[tokio::test]
    async fn test_publish_reaches_matching_role_only() {
        let fanout = RoleFanout::new(16);
        let mut admin_rx = fanout.subscribe(StaffRole::Admin).await;
        let mut manager_rx = fanout.subscribe(StaffRole::Manager).await;

        fanout.publish(notification(StaffRole::Admin)).await;

        let got = admin_rx.try_recv().unwrap();
        assert_eq!(got.recipient_role, StaffRole::Admin);
        assert!(manager_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_dropping_receiver_releases_subscription() {
        let fanout = RoleFanout::new(16);
        let rx = fanout.subscribe(StaffRole::Admin).await;
        assert_eq!(fanout.subscriber_count(StaffRole::Admin).await, 1);
        drop(rx);
        assert_eq!(fanout.subscriber_count(StaffRole::Admin).await, 0);
    }
}
