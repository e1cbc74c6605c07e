//! Local view state owned by a pantry screen.

/// Name-substring search filter.
pub mod filter;
/// Add/edit form session state machine.
pub mod session;
/// Screen-scoped inventory and session state.
pub mod state;
