//! Migration status flags and the per-session gate state machine.

use serde::{Deserialize, Serialize};

/// Which legacy data sets have already been copied into the store.
///
/// Computed on demand by existence queries; never cached beyond a single
/// check-and-run cycle. Once a flag is true a correct run never recomputes
/// it as false (migration is additive and idempotent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationStatus {
    /// Legacy staff accounts have been migrated.
    pub users_migrated: bool,
    /// Legacy maintenance tickets have been migrated.
    pub tickets_migrated: bool,
}

impl MigrationStatus {
    /// Whether all legacy data sets are present in the store.
    pub fn is_complete(&self) -> bool {
        self.users_migrated && self.tickets_migrated
    }
}

/// Per-session state of the migration gate.
///
/// `Error` is terminal for the session: the gate is not retried until the
/// next process start, and store-backed features run degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// Status queries in flight; dependent reads may be incomplete.
    Checking,
    /// At least one legacy data set still needs migrating.
    Needed,
    /// All legacy data is in the store; dependents may activate.
    Completed,
    /// A migration step failed; terminal for this session.
    Error,
}

impl GateState {
    /// Whether dependent store-backed features may activate.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completeness() {
        let status = MigrationStatus {
            users_migrated: true,
            tickets_migrated: false,
        };
        assert!(!status.is_complete());
        assert!(MigrationStatus {
            users_migrated: true,
            tickets_migrated: true
        }
        .is_complete());
    }
}
