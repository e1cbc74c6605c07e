pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::{
    record::RecordFields,
    types::{CollectionScope, RecordId},
};

#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    Serde(serde_json::Error),
    Message(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

pub(crate) type Document = serde_json::Map<String, serde_json::Value>;

pub(crate) fn encode_document(fields: RecordFields) -> StoreResult<Document> {
    match serde_json::to_value(fields)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(StoreError::Message(format!(
            "record fields encoded as non-object: {other}"
        ))),
    }
}

pub(crate) fn decode_document(doc: &Document) -> StoreResult<RecordFields> {
    Ok(serde_json::from_value(serde_json::Value::Object(
        doc.clone(),
    ))?)
}

/// Scoped document collection holding inventory records.
///
/// Each write targets a single document and is atomic at the store layer;
/// multi-record consistency is never required. No client-side timeout is
/// imposed, so a hung call suspends the affected operation indefinitely.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records in `scope`, in backend insertion order.
    ///
    /// The order is whatever the backend returns and is not guaranteed stable
    /// across refreshes.
    async fn list_all(&self, scope: &CollectionScope) -> StoreResult<Vec<(RecordId, RecordFields)>>;

    /// Writes one document.
    ///
    /// With `merge`, the given fields merge into any existing document (keys
    /// not written survive); without it the document is replaced.
    async fn upsert(
        &self,
        scope: &CollectionScope,
        id: &RecordId,
        fields: RecordFields,
        merge: bool,
    ) -> StoreResult<()>;

    /// Deletes one document unconditionally.
    ///
    /// Deleting an absent id is a no-op success.
    async fn delete(&self, scope: &CollectionScope, id: &RecordId) -> StoreResult<()>;

    /// Allocates a fresh opaque record id.
    fn fresh_id(&self) -> RecordId;
}
