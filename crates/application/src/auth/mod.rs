//! Session handling for the API client.
//!
//! This module provides:
//! - An in-memory credential store for tests and ephemeral sessions
//! - The single-flight coordinator that serialises token refreshes

mod memory_store;
mod refresh;

pub use memory_store::MemoryCredentialStore;
pub(crate) use refresh::follow;
pub use refresh::{Acquire, RefreshCoordinator, RefreshLease, RefreshOutcome};
