//! Inventory synchronizer: reconciles the record store's authoritative state
//! into local view state and translates user intents into store writes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::{
    core::state::PantryState,
    record::{InventoryRecord, RecordDraft, ValidationError},
    store::{RecordStore, StoreError},
    types::{CollectionScope, RecordId, RefreshSeq},
};

/// Failure of one synchronizer operation.
///
/// Nothing here is fatal: every failure is scoped to the single operation that
/// raised it, and local edit-session state is left untouched.
#[derive(Debug)]
pub enum SyncError {
    /// Form input rejected before any remote call.
    Validation(ValidationError),
    /// Remote fetch/write/delete failure.
    Store(StoreError),
    /// Edit targeted a record absent from last-known local state.
    UnknownRecord(RecordId),
}

impl From<ValidationError> for SyncError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for SyncError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Scoped bridge between a [`RecordStore`] and a [`PantryState`].
///
/// One synchronizer serves both collection layouts: the global scope keys
/// records by name with merge writes, user scopes key by store-allocated ids.
/// Mutations return once the remote write acknowledges; the caller drives the
/// follow-up [`Synchronizer::refresh`] that brings the local view up to date.
pub struct Synchronizer<S: RecordStore> {
    store: Arc<S>,
    scope: CollectionScope,
    refresh_seq: AtomicU64,
}

impl<S: RecordStore> Synchronizer<S> {
    /// Synchronizer targeting `scope` on `store`.
    pub fn new(store: Arc<S>, scope: CollectionScope) -> Self {
        Self {
            store,
            scope,
            refresh_seq: AtomicU64::new(0),
        }
    }

    /// Collection scope this synchronizer targets.
    pub fn scope(&self) -> &CollectionScope {
        &self.scope
    }

    /// Fetches the complete record set along with its refresh ticket.
    ///
    /// The ticket is taken before the fetch suspends, so tickets order fetches
    /// by issue time even when responses arrive out of order.
    pub async fn fetch(&self) -> Result<(RefreshSeq, Vec<InventoryRecord>), SyncError> {
        let seq = self.refresh_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let rows = self.store.list_all(&self.scope).await?;
        let records = rows
            .into_iter()
            .map(|(id, fields)| InventoryRecord::from_parts(id, fields))
            .collect();
        Ok((seq, records))
    }

    /// Replaces local inventory with the store's current record set.
    ///
    /// Idempotent and safe to call repeatedly. Returns whether the snapshot
    /// was applied; a response superseded by a newer one is dropped.
    pub async fn refresh(&self, state: &mut PantryState) -> Result<bool, SyncError> {
        let (seq, records) = self.fetch().await?;
        Ok(state.apply_snapshot(seq, records))
    }

    /// Creates a record from validated form input.
    ///
    /// On a validation failure no remote write is issued. In the global scope
    /// the record is keyed by its name and written with merge, so re-adding an
    /// existing name overwrites it; in user scopes a fresh id is allocated.
    pub async fn add_record(&self, draft: &RecordDraft) -> Result<RecordId, SyncError> {
        let fields = draft.validated()?;

        let (id, merge) = if self.scope.keys_by_name() {
            (fields.name.clone(), true)
        } else {
            (self.store.fresh_id(), false)
        };

        self.store.upsert(&self.scope, &id, fields, merge).await?;
        Ok(id)
    }

    /// Overwrites an existing record's quantity and expiration.
    ///
    /// The record must be present in last-known local state; its stored name
    /// is carried over unchanged regardless of what the form holds.
    pub async fn update_record(
        &self,
        state: &PantryState,
        id: &RecordId,
        quantity: &str,
        expiration: &str,
    ) -> Result<(), SyncError> {
        let current = state
            .find(id)
            .ok_or_else(|| SyncError::UnknownRecord(id.clone()))?;

        let draft = RecordDraft {
            name: current.name.clone(),
            quantity: quantity.to_string(),
            expiration: expiration.to_string(),
        };
        let fields = draft.validated()?;

        self.store.upsert(&self.scope, id, fields, true).await?;
        Ok(())
    }

    /// Deletes a record unconditionally.
    ///
    /// No existence check is made; deleting an absent id is a no-op success,
    /// so the operation is idempotent.
    pub async fn remove_record(&self, id: &RecordId) -> Result<(), SyncError> {
        self.store.delete(&self.scope, id).await?;
        Ok(())
    }
}
