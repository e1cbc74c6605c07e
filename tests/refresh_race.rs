use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use shelfsmart::{
    core::state::PantryState,
    record::RecordFields,
    store::{RecordStore, StoreResult},
    sync::Synchronizer,
    types::{CollectionScope, RecordId},
};

fn fields(name: &str, quantity: u32) -> RecordFields {
    RecordFields {
        name: name.to_string(),
        quantity,
        expiration: "2024-12-01".to_string(),
    }
}

/// Returns a different canned snapshot per `list_all` call, simulating a store
/// whose contents change between two overlapping fetches.
struct StagedStore {
    snapshots: Vec<Vec<(RecordId, RecordFields)>>,
    calls: AtomicUsize,
}

#[async_trait]
impl RecordStore for StagedStore {
    async fn list_all(&self, _scope: &CollectionScope) -> StoreResult<Vec<(RecordId, RecordFields)>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let idx = call.min(self.snapshots.len() - 1);
        Ok(self.snapshots[idx].clone())
    }

    async fn upsert(
        &self,
        _scope: &CollectionScope,
        _id: &RecordId,
        _fields: RecordFields,
        _merge: bool,
    ) -> StoreResult<()> {
        Ok(())
    }

    async fn delete(&self, _scope: &CollectionScope, _id: &RecordId) -> StoreResult<()> {
        Ok(())
    }

    fn fresh_id(&self) -> RecordId {
        "rec-000001".to_string()
    }
}

#[tokio::test]
async fn stale_refresh_response_is_dropped() {
    let store = Arc::new(StagedStore {
        snapshots: vec![
            vec![("a".to_string(), fields("Old Milk", 1))],
            vec![
                ("a".to_string(), fields("Milk", 2)),
                ("b".to_string(), fields("Eggs", 12)),
            ],
        ],
        calls: AtomicUsize::new(0),
    });
    let sync = Synchronizer::new(store, CollectionScope::Global);
    let mut state = PantryState::new();

    // Fetch A is issued first but its response arrives after fetch B's.
    let (seq_a, recs_a) = sync.fetch().await.expect("fetch a");
    let (seq_b, recs_b) = sync.fetch().await.expect("fetch b");
    assert!(seq_b > seq_a);

    assert!(state.apply_snapshot(seq_b, recs_b.clone()));
    assert!(!state.apply_snapshot(seq_a, recs_a));

    assert_eq!(state.inventory(), recs_b.as_slice());
    assert_eq!(state.refresh_applied(), seq_b);
}

#[tokio::test]
async fn in_order_refreshes_apply_normally() {
    let store = Arc::new(StagedStore {
        snapshots: vec![
            vec![("a".to_string(), fields("Milk", 2))],
            vec![("a".to_string(), fields("Milk", 1))],
        ],
        calls: AtomicUsize::new(0),
    });
    let sync = Synchronizer::new(store, CollectionScope::Global);
    let mut state = PantryState::new();

    assert!(sync.refresh(&mut state).await.expect("first refresh"));
    assert_eq!(state.find(&"a".to_string()).expect("rec").quantity, 2);

    assert!(sync.refresh(&mut state).await.expect("second refresh"));
    assert_eq!(state.find(&"a".to_string()).expect("rec").quantity, 1);
}
