//! User-facing alert cues for freshly inserted notifications.

use async_trait::async_trait;
use tracing::info;

use barkeep_core::result::AppResult;
use barkeep_entity::notification::Notification;

/// Sink for the attention cue emitted when a live notification arrives.
///
/// Cue failure must never break insert handling; callers swallow and log
/// errors from [`AlertSink::play_cue`].
#[async_trait]
pub trait AlertSink: Send + Sync + std::fmt::Debug + 'static {
    /// Emit a cue for a newly arrived notification.
    async fn play_cue(&self, notification: &Notification) -> AppResult<()>;
}

/// Alert sink that announces the cue on the log stream.
#[derive(Debug, Clone, Default)]
pub struct TracingAlertSink;

#[async_trait]
impl AlertSink for TracingAlertSink {
    async fn play_cue(&self, notification: &Notification) -> AppResult<()> {
        info!(
            id = %notification.id,
            kind = %notification.kind,
            "New notification: {}",
            cue_text(notification)
        );
        Ok(())
    }
}

/// Announcement line for a cue: the title plus the message body.
fn cue_text(notification: &Notification) -> String {
    if notification.message.is_empty() {
        notification.title.clone()
    } else {
        format!("{}: {}", notification.title, notification.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use barkeep_entity::notification::NotificationKind;
    use barkeep_entity::user::StaffRole;

    fn notification(title: &str, message: &str) -> Notification {
        Notification {
            id: uuid::Uuid::new_v4(),
            title: title.to_string(),
            message: message.to_string(),
            kind: NotificationKind::Info,
            read: false,
            created_at: chrono::Utc::now(),
            recipient_role: StaffRole::Admin,
        }
    }

    #[test]
    fn cue_carries_the_message_body() {
        let line = cue_text(&notification("Keg low", "Tap 3 is nearly empty"));
        assert!(line.contains("Keg low"));
        assert!(line.contains("Tap 3 is nearly empty"));
    }

    #[test]
    fn empty_message_falls_back_to_title() {
        assert_eq!(cue_text(&notification("Shift change", "")), "Shift change");
    }
}
