//! In-memory document backend; reference implementation and test double.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use hashbrown::HashMap;
use tokio::sync::Mutex;

use crate::{
    record::RecordFields,
    types::{CollectionScope, RecordId},
};

use super::{decode_document, encode_document, Document, RecordStore, StoreResult};

/// Insertion-ordered document collections keyed by scope.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    collections: Mutex<HashMap<String, Vec<(RecordId, Document)>>>,
    next_id: AtomicU64,
}

impl MemoryRecordStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list_all(&self, scope: &CollectionScope) -> StoreResult<Vec<(RecordId, RecordFields)>> {
        let collections = self.collections.lock().await;
        let Some(docs) = collections.get(&scope.key()) else {
            return Ok(Vec::new());
        };

        let mut out = Vec::with_capacity(docs.len());
        for (id, doc) in docs {
            out.push((id.clone(), decode_document(doc)?));
        }
        Ok(out)
    }

    async fn upsert(
        &self,
        scope: &CollectionScope,
        id: &RecordId,
        fields: RecordFields,
        merge: bool,
    ) -> StoreResult<()> {
        let incoming = encode_document(fields)?;
        let mut collections = self.collections.lock().await;
        let docs = collections.entry(scope.key()).or_default();

        match docs.iter_mut().find(|(existing, _)| existing == id) {
            Some((_, doc)) => {
                if merge {
                    doc.extend(incoming);
                } else {
                    *doc = incoming;
                }
            }
            None => docs.push((id.clone(), incoming)),
        }
        Ok(())
    }

    async fn delete(&self, scope: &CollectionScope, id: &RecordId) -> StoreResult<()> {
        let mut collections = self.collections.lock().await;
        if let Some(docs) = collections.get_mut(&scope.key()) {
            docs.retain(|(existing, _)| existing != id);
        }
        Ok(())
    }

    fn fresh_id(&self) -> RecordId {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        format!("rec-{n:06}")
    }
}
