//! Migration gate flows over JSON exports and a scripted target.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use barkeep_core::config::migration::MigrationConfig;
use barkeep_core::error::AppError;
use barkeep_core::result::AppResult;
use barkeep_entity::migration::GateState;
use barkeep_store::migration::{
    JsonLegacySource, LegacyTicket, LegacyUser, MigrationGate, MigrationTarget,
};

#[derive(Debug, Default)]
struct ScriptedTarget {
    users: Mutex<Vec<String>>,
    tickets: Mutex<Vec<String>>,
    fail_upserts: AtomicBool,
}

#[async_trait]
impl MigrationTarget for ScriptedTarget {
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

fn write_exports(dir: &tempfile::TempDir) -> MigrationConfig {
    let users = dir.path().join("users.json");
    let tickets = dir.path().join("tickets.json");
    std::fs::write(
        &users,
        r#"[
            {"username": "marco", "display_name": "Marco", "role": "bartender"},
            {"username": "ana", "display_name": "Ana", "role": "admin"}
        ]"#,
    )
    .unwrap();
    std::fs::write(
        &tickets,
        r#"[{"key": "T-7", "title": "Ice machine noisy", "status": "open"}]"#,
    )
    .unwrap();

    MigrationConfig {
        legacy_users_path: users.to_string_lossy().into_owned(),
        legacy_tickets_path: tickets.to_string_lossy().into_owned(),
    }
}

#[tokio::test]
async fn check_status_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let gate = MigrationGate::new(
        Arc::new(JsonLegacySource::new(&write_exports(&dir))),
        Arc::new(ScriptedTarget::default()),
    );

    let first = gate.check_status().await.unwrap();
    let second = gate.check_status().await.unwrap();
    assert_eq!(first, second);
    assert!(!first.users_migrated);
    assert!(!first.tickets_migrated);
}

#[tokio::test]
async fn gate_migrates_exports_then_second_run_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let target = Arc::new(ScriptedTarget::default());
    let gate = MigrationGate::new(
        Arc::new(JsonLegacySource::new(&write_exports(&dir))),
        Arc::clone(&target) as _,
    );

    assert_eq!(gate.run().await, GateState::Completed);
    assert!(gate.check_status().await.unwrap().is_complete());
    assert_eq!(target.users.lock().await.len(), 2);
    assert_eq!(target.tickets.lock().await.len(), 1);

    // Invoking the gate again (as every process start does) adds nothing.
    assert_eq!(gate.run().await, GateState::Completed);
    assert_eq!(target.users.lock().await.len(), 2);
}

#[tokio::test]
async fn missing_exports_complete_without_writes() {
    let target = Arc::new(ScriptedTarget::default());
    let gate = MigrationGate::new(
        Arc::new(JsonLegacySource::new(&MigrationConfig {
            legacy_users_path: "/nonexistent/users.json".into(),
            legacy_tickets_path: "/nonexistent/tickets.json".into(),
        })),
        Arc::clone(&target) as _,
    );

    assert_eq!(gate.run().await, GateState::Completed);
    assert!(target.users.lock().await.is_empty());
}

#[tokio::test]
async fn store_failure_is_terminal_error() {
    let dir = tempfile::tempdir().unwrap();
    let target = Arc::new(ScriptedTarget::default());
    target.fail_upserts.store(true, Ordering::SeqCst);
    let gate = MigrationGate::new(
        Arc::new(JsonLegacySource::new(&write_exports(&dir))),
        Arc::clone(&target) as _,
    );

    assert_eq!(gate.run().await, GateState::Error);
    assert!(target.users.lock().await.is_empty());

    // The same gate re-run succeeds once the store recovers, which is the
    // next-session semantics of a full reload.
    target.fail_upserts.store(false, Ordering::SeqCst);
    assert_eq!(gate.run().await, GateState::Completed);
}
