//! # Storage Module
//!
//! Handles all data persistence for the life battery.
//!
//! Everything is stored as JSON strings under string keys, the same layout
//! the mobile app keeps in its local storage. The profile store only talks to
//! the [`KeyValueStorage`] trait, so the backend can be swapped without
//! touching domain logic.
//!
//! ## Implementations
//!
//! - **FileStorage**: one JSON file per key in the data directory, written
//!   atomically through a temp file
//! - **MemoryStorage**: HashMap-backed, for tests and ephemeral sessions

pub mod file;
pub mod keys;
pub mod memory;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use file::FileStorage;
pub use keys::{StorageKeys, DEFAULT_KEY_PREFIX};
pub use memory::MemoryStorage;
pub use traits::{KeyValueStorage, StorageError, StorageResult};
