use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use shelfsmart::{
    auth::Identity,
    core::{
        session::{FormField, SessionMode},
        state::PantryState,
    },
    record::{RecordDraft, RecordFields},
    runtime::handle::{spawn_pantry, ControllerError, PantryHandle},
    store::{memory::MemoryRecordStore, RecordStore, StoreError, StoreResult},
    sync::{SyncError, Synchronizer},
    types::{CollectionScope, RecordId, ScopePolicy},
};
use tokio::sync::watch;

/// In-memory store whose reads or writes can be switched to fail on demand.
struct FlakyStore {
    inner: MemoryRecordStore,
    fail_lists: AtomicBool,
    fail_upserts: AtomicBool,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: MemoryRecordStore::new(),
            fail_lists: AtomicBool::new(false),
            fail_upserts: AtomicBool::new(false),
        }
    }

    fn outage() -> StoreError {
        StoreError::Message("backend unavailable".to_string())
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn list_all(&self, scope: &CollectionScope) -> StoreResult<Vec<(RecordId, RecordFields)>> {
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        self.inner.list_all(scope).await
    }

    async fn upsert(
        &self,
        scope: &CollectionScope,
        id: &RecordId,
        fields: RecordFields,
        merge: bool,
    ) -> StoreResult<()> {
        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        self.inner.upsert(scope, id, fields, merge).await
    }

    async fn delete(&self, scope: &CollectionScope, id: &RecordId) -> StoreResult<()> {
        self.inner.delete(scope, id).await
    }

    fn fresh_id(&self) -> RecordId {
        self.inner.fresh_id()
    }
}

fn spawn_global(store: &Arc<FlakyStore>) -> (PantryHandle, watch::Sender<Option<Identity>>) {
    let (auth_tx, auth_rx) = watch::channel(None);
    let handle = spawn_pantry(Arc::clone(store), ScopePolicy::Global, auth_rx);
    (handle, auth_tx)
}

async fn fill_form(handle: &PantryHandle, name: &str, quantity: &str, expiration: &str) {
    handle.edit_field(FormField::Name, name).await.expect("name");
    handle
        .edit_field(FormField::Quantity, quantity)
        .await
        .expect("quantity");
    handle
        .edit_field(FormField::Expiration, expiration)
        .await
        .expect("expiration");
}

#[tokio::test]
async fn failed_write_surfaces_the_error_and_keeps_the_session() {
    let store = Arc::new(FlakyStore::new());
    let (handle, _auth_tx) = spawn_global(&store);

    fill_form(&handle, "Milk", "2", "2024-12-01").await;
    store.fail_upserts.store(true, Ordering::SeqCst);

    match handle.submit().await {
        Err(ControllerError::Sync(SyncError::Store(_))) => {}
        other => panic!("expected store failure, got {other:?}"),
    }

    // The form survives the failure so the user can retry as-is.
    let form = handle.form().await.expect("form");
    assert_eq!(form.mode, SessionMode::Composing);
    assert_eq!(form.name, "Milk");
    assert_eq!(form.quantity, "2");
    assert!(handle.view().await.expect("view").is_empty());

    store.fail_upserts.store(false, Ordering::SeqCst);
    let id = handle.submit().await.expect("retry");
    let view = handle.view().await.expect("view");
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].id, id);

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn failed_refresh_leg_does_not_fail_an_acknowledged_write() {
    let store = Arc::new(FlakyStore::new());
    let (handle, _auth_tx) = spawn_global(&store);

    fill_form(&handle, "Milk", "2", "2024-12-01").await;
    store.fail_lists.store(true, Ordering::SeqCst);

    // The write itself lands; only the follow-up refresh fails, and that
    // failure stays out of the submit result.
    let id = handle.submit().await.expect("submit");
    assert_eq!(id, "Milk");

    // The local list did not advance, and the form reset as on any
    // successful submit.
    assert!(handle.view().await.expect("view").is_empty());
    let form = handle.form().await.expect("form");
    assert_eq!(form.mode, SessionMode::Idle);

    // An explicit refresh while the store is down reports the error.
    match handle.refresh().await {
        Err(ControllerError::Sync(SyncError::Store(_))) => {}
        other => panic!("expected store failure, got {other:?}"),
    }

    // Once the store recovers, the next refresh picks up the write.
    store.fail_lists.store(false, Ordering::SeqCst);
    assert!(handle.refresh().await.expect("refresh"));
    let view = handle.view().await.expect("view");
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].id, id);
    assert_eq!(view[0].quantity, 2);

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn failed_refresh_leg_still_acknowledges_a_delete() {
    let store = Arc::new(FlakyStore::new());
    let (handle, _auth_tx) = spawn_global(&store);

    fill_form(&handle, "Milk", "2", "2024-12-01").await;
    let id = handle.submit().await.expect("submit");

    store.fail_lists.store(true, Ordering::SeqCst);
    handle.remove(id.clone()).await.expect("remove");

    // The stale local copy lingers until a refresh succeeds.
    assert_eq!(handle.view().await.expect("view").len(), 1);

    store.fail_lists.store(false, Ordering::SeqCst);
    assert!(handle.refresh().await.expect("refresh"));
    assert!(handle.view().await.expect("view").is_empty());

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn refresh_error_leaves_local_state_at_last_snapshot() {
    let store = Arc::new(FlakyStore::new());
    let sync = Synchronizer::new(
        Arc::clone(&store),
        CollectionScope::User("user-000001".to_string()),
    );
    let mut state = PantryState::new();

    let id = sync
        .add_record(&RecordDraft {
            name: "Milk".to_string(),
            quantity: "2".to_string(),
            expiration: "2024-12-01".to_string(),
        })
        .await
        .expect("add");
    sync.refresh(&mut state).await.expect("refresh");
    assert_eq!(state.inventory().len(), 1);

    store.fail_lists.store(true, Ordering::SeqCst);
    match sync.refresh(&mut state).await {
        Err(SyncError::Store(_)) => {}
        other => panic!("expected store failure, got {other:?}"),
    }
    assert_eq!(state.find(&id).map(|rec| rec.quantity), Some(2));

    store.fail_lists.store(false, Ordering::SeqCst);
    assert!(sync.refresh(&mut state).await.expect("refresh"));
    assert_eq!(state.inventory().len(), 1);
}
