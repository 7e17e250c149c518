//! LISTEN/NOTIFY-backed change feed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgListener;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};
use uuid::Uuid;

use barkeep_core::config::realtime::RealtimeConfig;
use barkeep_core::result::AppResult;
use barkeep_entity::notification::Notification;
use barkeep_entity::user::StaffRole;

use crate::traits::ChangeFeed;

use super::fanout::RoleFanout;

/// Change feed backed by a Postgres NOTIFY channel.
///
/// One listener task per process decodes trigger payloads and publishes
/// them into the role fan-out. Subscribers hold plain broadcast receivers;
/// dropping a receiver releases the subscription.
#[derive(Debug)]
pub struct PgChangeFeed {
    fanout: Arc<RoleFanout>,
    notify_channel: String,
}

impl PgChangeFeed {
    /// Create a new change feed from configuration.
    pub fn new(config: &RealtimeConfig) -> Self {
        Self {
            fanout: Arc::new(RoleFanout::new(config.feed_buffer_size)),
            notify_channel: config.notify_channel.clone(),
        }
    }

    /// Spawn the listener task.
    ///
    /// The task runs until the shutdown flag flips; transient listen
    /// failures are retried with a short backoff.
    pub fn spawn_listener(
        &self,
        pool: PgPool,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let fanout = Arc::clone(&self.fanout);
        let channel = self.notify_channel.clone();

        tokio::spawn(async move {
            loop {
                if *shutdown.borrow() {
                    return;
                }

                let mut listener = match PgListener::connect_with(&pool).await {
                    Ok(l) => l,
                    Err(e) => {
                        error!("Change feed failed to connect: {}", e);
                        tokio::time::sleep(Duration::from_secs(5)).await;
                        continue;
                    }
                };
                if let Err(e) = listener.listen(&channel).await {
                    error!("Change feed failed to LISTEN on '{}': {}", channel, e);
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    continue;
                }
                debug!(channel = %channel, "Change feed listening");

                loop {
                    tokio::select! {
                        changed = shutdown.changed() => {
                            if changed.is_err() || *shutdown.borrow() {
                                debug!("Change feed shutting down");
                                return;
                            }
                        }
                        msg = listener.recv() => {
                            match msg {
                                Ok(notification) => {
                                    dispatch_payload(&pool, &fanout, notification.payload()).await;
                                }
                                Err(e) => {
                                    // Connection dropped; reconnect from the top.
                                    warn!("Change feed recv error, reconnecting: {}", e);
                                    break;
                                }
                            }
                        }
                    }
                }
            }
        })
    }
}

/// Resolve one trigger payload and publish the row to the fan-out.
///
/// Payloads carry only the inserted row's id; the full row is refetched
/// here so the NOTIFY payload stays under the Postgres size cap no matter
/// how long the title and message are.
async fn dispatch_payload(pool: &PgPool, fanout: &RoleFanout, payload: &str) {
    let Some(id) = parse_payload(payload) else {
        warn!("Discarding undecodable feed payload: {payload:?}");
        return;
    };
    match sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
    {
        Ok(Some(row)) => fanout.publish(row).await,
        Ok(None) => warn!(%id, "Feed event for a row that no longer exists"),
        Err(e) => warn!(%id, "Failed to refetch feed row: {}", e),
    }
}

/// Trigger payloads are bare uuids.
fn parse_payload(payload: &str) -> Option<Uuid> {
    payload.trim().parse().ok()
}

#[async_trait]
impl ChangeFeed for PgChangeFeed {
    async fn subscribe(&self, role: StaffRole) -> AppResult<broadcast::Receiver<Notification>> {
        Ok(self.fanout.subscribe(role).await)
    }
}
