//! timer-sync: Cached timer state for the invoicing desktop client.
//!
//! The backend owns the truth about the running timer. This crate keeps a
//! local copy the UI can read synchronously, advances it once a second
//! while a timer runs, and persists it so a restart picks up where the
//! app left off.

mod snapshot;
mod store;
mod ticker;

pub use snapshot::{SnapshotStore, SNAPSHOT_VERSION};
pub use store::TimerStore;
