//! The client-local notification projection.

use uuid::Uuid;

use barkeep_entity::notification::Notification;

/// An ordered, newest-first view of notification rows for one session.
///
/// The projection is a derived copy of server state: it is replaced
/// wholesale by an initial fetch, grown one row at a time by insert
/// events, and mutated in place by read acknowledgements. Read-state
/// changes never reorder entries. Growth from live inserts is capped;
/// the oldest entries are dropped beyond the cap.
#[derive(Debug, Clone)]
pub struct NotificationProjection {
    entries: Vec<Notification>,
    cap: usize,
}

impl NotificationProjection {
    /// Create an empty projection retaining at most `cap` entries.
    pub fn new(cap: usize) -> Self {
        Self {
            entries: Vec::new(),
            cap: cap.max(1),
        }
    }

    /// Replace the whole projection with freshly fetched rows.
    ///
    /// Rows are expected newest first; anything beyond the cap is dropped.
    pub fn replace(&mut self, mut rows: Vec<Notification>) {
        rows.truncate(self.cap);
        self.entries = rows;
    }

    /// Apply a live insert event.
    ///
    /// Prepends exactly one entry; a row whose id is already present is
    /// ignored, so replayed events cannot duplicate. Returns whether the
    /// row was added.
    pub fn apply_insert(&mut self, row: Notification) -> bool {
        if self.entries.iter().any(|n| n.id == row.id) {
            return false;
        }
        self.entries.insert(0, row);
        self.entries.truncate(self.cap);
        true
    }

    /// Mark one entry read in place. Returns whether an unread entry
    /// changed state.
    pub fn mark_read(&mut self, id: Uuid) -> bool {
        match self.entries.iter_mut().find(|n| n.id == id) {
            Some(entry) if !entry.read => {
                entry.read = true;
                true
            }
            _ => false,
        }
    }

    /// Mark every entry read, returning the ids that were unread before
    /// the mutation. The returned set is what a batched store update
    /// should target.
    pub fn mark_all_read(&mut self) -> Vec<Uuid> {
        let unread: Vec<Uuid> = self
            .entries
            .iter()
            .filter(|n| !n.read)
            .map(|n| n.id)
            .collect();
        for entry in &mut self.entries {
            entry.read = true;
        }
        unread
    }

    /// Count of unread entries. Derived, so it can never go negative or
    /// exceed the projection length.
    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the projection holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
