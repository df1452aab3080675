//! # Storage Traits
//!
//! This module defines the key-value storage abstraction the profile store
//! persists through, so the domain layer can run against an in-memory map in
//! tests and a data directory on disk in the application.

use thiserror::Error;

/// Failure reported by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Storage is unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Trait defining the interface for durable key-value storage
///
/// Values are opaque strings (JSON documents in practice). A missing key is
/// not an error: `get` returns `Ok(None)`.
pub trait KeyValueStorage {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a single key; removing a missing key succeeds
    fn remove(&mut self, key: &str) -> StorageResult<()>;

    /// Remove every key
    fn clear(&mut self) -> StorageResult<()>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &mut S {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn clear(&mut self) -> StorageResult<()> {
        (**self).clear()
    }
}
