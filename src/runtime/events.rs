//! Controller event stream payloads.

use crate::types::RecordId;

/// Events emitted from the pantry controller loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PantryEvent {
    /// A fetched snapshot replaced the local inventory.
    Refreshed {
        /// Number of records now held locally.
        count: usize,
    },
    /// A new record was written.
    Added {
        /// Id of the written record.
        id: RecordId,
    },
    /// An existing record was overwritten through the edit flow.
    Updated {
        /// Id of the edited record.
        id: RecordId,
    },
    /// A record was deleted.
    Removed {
        /// Id of the deleted record.
        id: RecordId,
    },
    /// The session ended and local state was cleared.
    SignedOut,
}
