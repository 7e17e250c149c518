//! In-memory store and change feed.
//!
//! Implements the same trait seams as the Postgres-backed client, for
//! tests and single-process operation without a database. Inserts are
//! published to subscribers exactly as the trigger-backed feed would.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tokio::sync::broadcast;
use uuid::Uuid;

use barkeep_core::error::AppError;
use barkeep_core::result::AppResult;
use barkeep_entity::notification::Notification;
use barkeep_entity::user::StaffRole;

use crate::feed::fanout::RoleFanout;
use crate::traits::{ChangeFeed, NewNotification, NotificationStore};

/// In-memory notification store with a built-in change feed.
#[derive(Debug)]
pub struct MemoryStore {
    rows: Mutex<Vec<Notification>>,
    fanout: Arc<RoleFanout>,
    /// When set, read operations fail (degraded-store simulation).
    fail_reads: AtomicBool,
    /// When set, write operations fail (divergence simulation).
    fail_writes: AtomicBool,
    write_calls: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fanout: Arc::new(RoleFanout::new(buffer_size)),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            write_calls: AtomicUsize::new(0),
        }
    }

    /// Make subsequent read operations fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent write operations fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of write calls issued so far (mark_read / mark_read_many).
    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    /// Snapshot of all rows, insertion order.
    pub async fn rows(&self) -> Vec<Notification> {
        self.rows.lock().await.clone()
    }

    fn check_reads(&self) -> AppResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::database("memory store: reads disabled"));
        }
        Ok(())
    }

    fn check_writes(&self) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::database("memory store: writes disabled"));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn fetch_latest(&self, role: StaffRole, limit: u32) -> AppResult<Vec<Notification>> {
        self.check_reads()?;
        let rows = self.rows.lock().await;
        let mut matching: Vec<Notification> = rows
            .iter()
            .filter(|n| n.recipient_role == role)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit as usize);
        Ok(matching)
    }

    async fn count_unread(&self, role: StaffRole) -> AppResult<i64> {
        self.check_reads()?;
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .filter(|n| n.recipient_role == role && !n.read)
            .count() as i64)
    }

    async fn mark_read(&self, id: Uuid) -> AppResult<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check_writes()?;
        let mut rows = self.rows.lock().await;
        if let Some(row) = rows.iter_mut().find(|n| n.id == id) {
            row.read = true;
        }
        Ok(())
    }

    async fn mark_read_many(&self, ids: &[Uuid]) -> AppResult<u64> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check_writes()?;
        let mut rows = self.rows.lock().await;
        let mut affected = 0;
        for row in rows.iter_mut() {
            if ids.contains(&row.id) && !row.read {
                row.read = true;
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn insert(&self, new: NewNotification) -> AppResult<Notification> {
        self.check_writes()?;
        let row = Notification {
            id: Uuid::new_v4(),
            title: new.title,
            message: new.message,
            kind: new.kind,
            read: false,
            created_at: Utc::now(),
            recipient_role: new.recipient_role,
        };
        self.rows.lock().await.push(row.clone());
        self.fanout.publish(row.clone()).await;
        Ok(row)
    }
}

#[async_trait]
impl ChangeFeed for MemoryStore {
    async fn subscribe(&self, role: StaffRole) -> AppResult<broadcast::Receiver<Notification>> {
        Ok(self.fanout.subscribe(role).await)
    }
}
