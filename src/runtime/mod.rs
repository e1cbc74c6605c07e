//! Single-writer pantry controller loop and its event stream.

/// Controller event payloads.
pub mod events;
/// Controller handle and command loop.
pub mod handle;
