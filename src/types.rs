//! Shared identifier aliases and collection scoping.

use serde::{Deserialize, Serialize};

/// Opaque identity-provider user id.
pub type UserId = String;
/// Opaque record identifier, unique within one collection scope.
pub type RecordId = String;
/// Monotonic refresh ticket number.
pub type RefreshSeq = u64;

/// Which record collection a synchronizer targets.
///
/// The global scope keys records by item name, so re-adding a name overwrites
/// the prior record. User scopes key records by store-allocated ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionScope {
    /// Single shared collection, name is the natural key.
    Global,
    /// Per-user collection under `users/{uid}/inventory`.
    User(UserId),
}

impl CollectionScope {
    /// Stable collection key used by store backends.
    pub fn key(&self) -> String {
        match self {
            Self::Global => "inventory".to_string(),
            Self::User(uid) => format!("users/{uid}/inventory"),
        }
    }

    /// True when writes key by the record name instead of an allocated id.
    pub fn keys_by_name(&self) -> bool {
        matches!(self, Self::Global)
    }
}

/// How a pantry controller derives its collection scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopePolicy {
    /// Always the shared global collection, signed in or not.
    Global,
    /// The signed-in user's collection; no scope while signed out.
    PerUser,
}
