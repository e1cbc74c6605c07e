use crate::{
    core::{filter::filter_by_name, session::EditSession},
    record::InventoryRecord,
    types::{RecordId, RefreshSeq},
};

/// Screen-scoped view state: the last-fetched inventory, the edit session, and
/// the search query.
///
/// Owned by exactly one controller and passed by reference to the synchronizer
/// and filter; there are no process-wide singletons. The inventory is replaced
/// wholesale on every refresh, never merged incrementally, so it always mirrors
/// some complete store response.
#[derive(Debug, Default)]
pub struct PantryState {
    inventory: Vec<InventoryRecord>,
    refresh_applied: RefreshSeq,
    /// Add/edit form session.
    pub session: EditSession,
    search_query: String,
}

impl PantryState {
    /// Empty, signed-out state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Full inventory in last-fetch order.
    pub fn inventory(&self) -> &[InventoryRecord] {
        &self.inventory
    }

    /// Record with the given id, if present in the last-known inventory.
    pub fn find(&self, id: &RecordId) -> Option<&InventoryRecord> {
        self.inventory.iter().find(|rec| &rec.id == id)
    }

    /// Displayed subset: the inventory filtered by the current search query.
    pub fn visible(&self) -> Vec<&InventoryRecord> {
        filter_by_name(&self.inventory, &self.search_query)
    }

    /// Current search query.
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Replaces the search query.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Highest refresh ticket applied so far.
    pub fn refresh_applied(&self) -> RefreshSeq {
        self.refresh_applied
    }

    /// Installs a fetched snapshot, replacing the inventory in full.
    ///
    /// Responses are accepted only in ticket order: a snapshot whose ticket is
    /// not newer than the last applied one arrived late and is dropped, so a
    /// slow stale fetch can never overwrite a newer view. Returns whether the
    /// snapshot was applied.
    pub fn apply_snapshot(&mut self, seq: RefreshSeq, records: Vec<InventoryRecord>) -> bool {
        if seq <= self.refresh_applied {
            return false;
        }
        self.refresh_applied = seq;
        self.inventory = records;
        true
    }

    /// Clears all state on sign-out.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
