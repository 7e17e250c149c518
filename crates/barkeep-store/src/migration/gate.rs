//! The migration gate state machine.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use barkeep_core::result::AppResult;
use barkeep_entity::migration::{GateState, MigrationStatus};
use barkeep_entity::user::StaffRole;

use crate::repositories::{StaffUserRepository, TicketRepository};

use super::legacy::{LegacySource, LegacyTicket, LegacyUser};

/// Store side of the migration: marker queries and natural-key upserts.
#[async_trait]
pub trait MigrationTarget: Send + Sync + std::fmt::Debug + 'static {
    /// Whether migrated staff users already exist in the store.
    async fn users_exist(&self) -> AppResult<bool>;

    /// Whether migrated tickets already exist in the store.
    async fn tickets_exist(&self) -> AppResult<bool>;

    /// Upsert legacy users by username. Returns rows inserted.
    async fn upsert_users(&self, users: &[LegacyUser]) -> AppResult<u64>;

    /// Upsert legacy tickets by natural key. Returns rows inserted.
    async fn upsert_tickets(&self, tickets: &[LegacyTicket]) -> AppResult<u64>;
}

/// Postgres-backed migration target over the staff user and ticket
/// repositories.
#[derive(Debug)]
pub struct PgMigrationTarget {
    users: Arc<StaffUserRepository>,
    tickets: Arc<TicketRepository>,
}

impl PgMigrationTarget {
    /// Create a target from the two repositories.
    pub fn new(users: Arc<StaffUserRepository>, tickets: Arc<TicketRepository>) -> Self {
        Self { users, tickets }
    }
}

#[async_trait]
impl MigrationTarget for PgMigrationTarget {
    async fn users_exist(&self) -> AppResult<bool> {
        self.users.any_exist().await
    }

    async fn tickets_exist(&self) -> AppResult<bool> {
        self.tickets.any_exist().await
    }

    async fn upsert_users(&self, users: &[LegacyUser]) -> AppResult<u64> {
        let mut inserted = 0;
        for user in users {
            let role = StaffRole::from_str(&user.role).unwrap_or(StaffRole::Bartender);
            let display_name = if user.display_name.is_empty() {
                &user.username
            } else {
                &user.display_name
            };
            if self
                .users
                .upsert_by_username(&user.username, display_name, role)
                .await?
            {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn upsert_tickets(&self, tickets: &[LegacyTicket]) -> AppResult<u64> {
        let mut inserted = 0;
        for ticket in tickets {
            if self
                .tickets
                .upsert_by_legacy_key(&ticket.key, &ticket.title, &ticket.description, &ticket.status)
                .await?
            {
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

/// One-time idempotent check-and-run procedure for legacy data.
///
/// Invoked on every process start; upsert-by-natural-key semantics make
/// repeated runs safe. Any failure is terminal for the session and
/// re-attempted only on the next start.
#[derive(Debug)]
pub struct MigrationGate {
    source: Arc<dyn LegacySource>,
    target: Arc<dyn MigrationTarget>,
}

impl MigrationGate {
    /// Create a gate over a legacy source and a store target.
    pub fn new(source: Arc<dyn LegacySource>, target: Arc<dyn MigrationTarget>) -> Self {
        Self { source, target }
    }

    /// Compute which legacy data sets are already in the store.
    ///
    /// Side-effect-free; calling it repeatedly before any migration runs
    /// returns the same result.
    pub async fn check_status(&self) -> AppResult<MigrationStatus> {
        Ok(MigrationStatus {
            users_migrated: self.target.users_exist().await?,
            tickets_migrated: self.target.tickets_exist().await?,
        })
    }

    /// Copy legacy staff accounts into the store.
    pub async fn migrate_users(&self) -> AppResult<()> {
        let users = self.source.load_users().await?;
        let inserted = self.target.upsert_users(&users).await?;
        info!(total = users.len(), inserted, "Migrated legacy staff users");
        Ok(())
    }

    /// Copy legacy maintenance tickets into the store.
    pub async fn migrate_tickets(&self) -> AppResult<()> {
        let tickets = self.source.load_tickets().await?;
        let inserted = self.target.upsert_tickets(&tickets).await?;
        info!(total = tickets.len(), inserted, "Migrated legacy tickets");
        Ok(())
    }

    /// Drive the gate to a terminal state.
    ///
    /// `Checking → Needed → Completed` when migrations run, `Checking →
    /// Completed` when nothing is missing, `Error` on any failure. The
    /// returned state is what dependents gate on; `Error` means the
    /// session runs degraded.
    pub async fn run(&self) -> GateState {
        let status = match self.check_status().await {
            Ok(s) => s,
            Err(e) => {
                error!("Migration status check failed: {}", e);
                return GateState::Error;
            }
        };

        if status.is_complete() {
            info!("Legacy data already migrated");
            return GateState::Completed;
        }

        info!(
            users_migrated = status.users_migrated,
            tickets_migrated = status.tickets_migrated,
            "Legacy migration needed"
        );

        if !status.users_migrated {
            if let Err(e) = self.migrate_users().await {
                error!("Staff user migration failed: {}", e);
                return GateState::Error;
            }
        }
        if !status.tickets_migrated {
            if let Err(e) = self.migrate_tickets().await {
                error!("Ticket migration failed: {}", e);
                return GateState::Error;
            }
        }

        GateState::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Mutex;

    use barkeep_core::error::AppError;

    #[derive(Debug, Default)]
    struct FakeSource {
        users: Vec<LegacyUser>,
        tickets: Vec<LegacyTicket>,
    }

    #[async_trait]
    impl LegacySource for FakeSource {
        async fn load_users(&self) -> AppResult<Vec<LegacyUser>> {
            Ok(self.users.clone())
        }

        async fn load_tickets(&self) -> AppResult<Vec<LegacyTicket>> {
            Ok(self.tickets.clone())
        }
    }

    #[derive(Debug, Default)]
    struct FakeTarget {
        users: Mutex<Vec<String>>,
        tickets: Mutex<Vec<String>>,
        fail_upserts: AtomicBool,
    }

    #[async_trait]
    impl MigrationTarget for FakeTarget {
        async fn users_exist(&self) -> AppResult<bool> {
            Ok(!self.users.lock().await.is_empty())
        }

        async fn tickets_exist(&self) -> AppResult<bool> {
            Ok(!self.tickets.lock().await.is_empty())
        }

        async fn upsert_users(&self, users: &[LegacyUser]) -> AppResult<u64> {
            if self.fail_upserts.load(Ordering::SeqCst) {
                return Err(AppError::database("store unreachable"));
            }
            let mut existing = self.users.lock().await;
            let mut inserted = 0;
            for user in users {
                if !existing.contains(&user.username) {
                    existing.push(user.username.clone());
                    inserted += 1;
                }
            }
            Ok(inserted)
        }

        async fn upsert_tickets(&self, tickets: &[LegacyTicket]) -> AppResult<u64> {
            if self.fail_upserts.load(Ordering::SeqCst) {
                return Err(AppError::database("store unreachable"));
            }
            let mut existing = self.tickets.lock().await;
            let mut inserted = 0;
            for ticket in tickets {
                if !existing.contains(&ticket.key) {
                    existing.push(ticket.key.clone());
                    inserted += 1;
                }
            }
            Ok(inserted)
        }
    }

    fn source_with_data() -> Arc<FakeSource> {
        Arc::new(FakeSource {
            users: vec![LegacyUser {
                username: "marco".into(),
                display_name: "Marco".into(),
                role: "bartender".into(),
            }],
            tickets: vec![LegacyTicket {
                key: "T-1".into(),
                title: "Tap 3 leaking".into(),
                description: String::new(),
                status: "open".into(),
            }],
        })
    }

    #[tokio::test]
    async fn test_check_status_idempotent() {
        let gate = MigrationGate::new(source_with_data(), Arc::new(FakeTarget::default()));
        let first = gate.check_status().await.unwrap();
        let second = gate.check_status().await.unwrap();
        assert_eq!(first, second);
        assert!(!first.is_complete());
    }

    #[tokio::test]
    async fn test_run_migrates_then_completes() {
        let target = Arc::new(FakeTarget::default());
        let gate = MigrationGate::new(source_with_data(), Arc::clone(&target) as _);

        assert_eq!(gate.run().await, GateState::Completed);
        assert!(gate.check_status().await.unwrap().is_complete());

        // Second run is a no-op on already-migrated data.
        assert_eq!(gate.run().await, GateState::Completed);
        assert_eq!(target.users.lock().await.len(), 1);
        assert_eq!(target.tickets.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_run_errors_on_store_failure() {
        let target = Arc::new(FakeTarget::default());
        target.fail_upserts.store(true, Ordering::SeqCst);
        let gate = MigrationGate::new(source_with_data(), Arc::clone(&target) as _);

        assert_eq!(gate.run().await, GateState::Error);
        // Nothing was written.
        assert!(target.users.lock().await.is_empty());
    }
}
