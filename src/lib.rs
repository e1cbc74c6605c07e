//! Pantry-inventory core: a scoped inventory synchronizer, an add/edit session
//! state machine, and a name-search filter over pluggable identity and record
//! store backends.
//!
//! # Examples
//!
//! Direct synchronizer usage with the in-memory store:
//! ```
//! use std::sync::Arc;
//!
//! use shelfsmart::{
//!     core::state::PantryState,
//!     record::RecordDraft,
//!     store::memory::MemoryRecordStore,
//!     sync::Synchronizer,
//!     types::CollectionScope,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Arc::new(MemoryRecordStore::new());
//! let sync = Synchronizer::new(store, CollectionScope::User("user-000001".to_string()));
//! let mut state = PantryState::new();
//!
//! let id = sync
//!     .add_record(&RecordDraft {
//!         name: "Milk".to_string(),
//!         quantity: "2".to_string(),
//!         expiration: "2024-12-01".to_string(),
//!     })
//!     .await
//!     .expect("add");
//! sync.refresh(&mut state).await.expect("refresh");
//! assert_eq!(state.find(&id).map(|rec| rec.quantity), Some(2));
//! # }
//! ```
//!
//! Screen-controller usage with a local identity provider:
//! ```no_run
//! use std::sync::Arc;
//!
//! use shelfsmart::{
//!     auth::{local::LocalIdentityProvider, IdentityProvider},
//!     core::session::FormField,
//!     runtime::{events::PantryEvent, handle::spawn_pantry},
//!     store::sqlite::SqliteRecordStore,
//!     types::ScopePolicy,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = Arc::new(SqliteRecordStore::open("pantry.db").expect("open store"));
//! let auth = LocalIdentityProvider::new();
//! let handle = spawn_pantry(store, ScopePolicy::PerUser, auth.auth_state());
//! let mut events = handle.subscribe();
//!
//! auth.sign_up("chef@example.com", "hunter22").await.expect("sign up");
//! // The sign-in notification installs the user's scope inside the controller
//! // loop; wait for its initial refresh before mutating.
//! while !matches!(events.recv().await.expect("event"), PantryEvent::Refreshed { .. }) {}
//!
//! handle.edit_field(FormField::Name, "Milk").await.expect("name");
//! handle.edit_field(FormField::Quantity, "2").await.expect("quantity");
//! handle.edit_field(FormField::Expiration, "2024-12-01").await.expect("expiration");
//! let _id = handle.submit().await.expect("submit");
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```

/// Identity-provider seam and local implementation.
pub mod auth;
/// Screen-local view state, edit session, and search filter.
pub mod core;
/// Inventory record, write payload, and form validation.
pub mod record;
/// Record-store seam plus memory and SQLite backends.
pub mod store;
/// Inventory synchronizer.
pub mod sync;
/// Single-writer pantry controller and events.
pub mod runtime;
/// Shared aliases and collection scoping.
pub mod types;
