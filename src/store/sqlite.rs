//! SQLite-backed document store, one JSON document per row.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

use crate::{
    record::RecordFields,
    types::{CollectionScope, RecordId},
};

use super::{decode_document, encode_document, Document, RecordStore, StoreError, StoreResult};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS documents (
    scope      TEXT NOT NULL,
    id         TEXT NOT NULL,
    doc        TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    PRIMARY KEY (scope, id)
);
";

/// SQLite implementation of [`crate::store::RecordStore`].
///
/// Blocking rusqlite calls run on `spawn_blocking` with the connection behind
/// a mutex, so trait methods stay non-blocking for the caller.
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
    next_id: AtomicU64,
}

impl SqliteRecordStore {
    /// Opens or creates a document store at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory store.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            next_id: AtomicU64::new(0),
        })
    }

    async fn with_conn<T, F>(&self, work: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.blocking_lock();
            work(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Message(format!("join error: {e}")))?
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn list_all(&self, scope: &CollectionScope) -> StoreResult<Vec<(RecordId, RecordFields)>> {
        let scope_key = scope.key();
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, doc FROM documents WHERE scope = ?1 ORDER BY created_at ASC, rowid ASC",
            )?;
            let rows = stmt.query_map(params![scope_key], |row| {
                let id: String = row.get(0)?;
                let doc: String = row.get(1)?;
                Ok((id, doc))
            })?;

            let mut out = Vec::new();
            for row in rows {
                let (id, doc) = row?;
                let doc: Document = serde_json::from_str(&doc)?;
                out.push((id, decode_document(&doc)?));
            }
            Ok(out)
        })
        .await
    }

    async fn upsert(
        &self,
        scope: &CollectionScope,
        id: &RecordId,
        fields: RecordFields,
        merge: bool,
    ) -> StoreResult<()> {
        let scope_key = scope.key();
        let id = id.clone();
        let incoming = encode_document(fields)?;

        self.with_conn(move |conn| {
            let tx = conn.transaction()?;

            let existing: Option<String> = tx
                .query_row(
                    "SELECT doc FROM documents WHERE scope = ?1 AND id = ?2",
                    params![scope_key, id],
                    |row| row.get(0),
                )
                .optional()?;

            let doc = match existing {
                Some(raw) if merge => {
                    let mut doc: Document = serde_json::from_str(&raw)?;
                    doc.extend(incoming);
                    doc
                }
                _ => incoming,
            };

            let payload = serde_json::to_string(&doc)?;
            tx.execute(
                "INSERT INTO documents(scope, id, doc, created_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(scope, id) DO UPDATE SET doc = excluded.doc",
                params![scope_key, id, payload, now_ms() as i64],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, scope: &CollectionScope, id: &RecordId) -> StoreResult<()> {
        let scope_key = scope.key();
        let id = id.clone();
        self.with_conn(move |conn| {
            // Absent ids delete zero rows, which is still success.
            conn.execute(
                "DELETE FROM documents WHERE scope = ?1 AND id = ?2",
                params![scope_key, id],
            )?;
            Ok(())
        })
        .await
    }

    fn fresh_id(&self) -> RecordId {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{:012x}{n:04x}", now_ms())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
