/// Test utilities for storage-backed tests
///
/// This module provides RAII-based cleanup that guarantees test data is removed
/// even if tests panic or fail.
use anyhow::Result;
use std::path::PathBuf;
use tempfile::TempDir;

use super::file::FileStorage;
use super::traits::{KeyValueStorage, StorageError, StorageResult};

/// RAII Test Environment that automatically cleans up on drop
pub struct TestEnvironment {
    /// The temporary directory - kept alive to prevent auto-cleanup until drop
    _temp_dir: TempDir,
    /// File storage rooted in the temporary directory
    pub storage: FileStorage,
    /// Base directory path for manual inspection if needed
    pub base_path: PathBuf,
}

impl TestEnvironment {
    /// Create a new test environment with automatic cleanup
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let storage = FileStorage::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            storage,
            base_path,
        })
    }
}

/// Storage whose reads and/or writes always fail
#[derive(Debug, Default)]
pub struct FailingStorage {
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub write_attempts: usize,
}

impl FailingStorage {
    pub fn broken() -> Self {
        Self {
            fail_reads: true,
            fail_writes: true,
            write_attempts: 0,
        }
    }

    pub fn read_only() -> Self {
        Self {
            fail_reads: false,
            fail_writes: true,
            write_attempts: 0,
        }
    }
}

impl KeyValueStorage for FailingStorage {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        if self.fail_reads {
            Err(StorageError::Unavailable("reads disabled".to_string()))
        } else {
            Ok(None)
        }
    }

    fn set(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
        self.write_attempts += 1;
        if self.fail_writes {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        } else {
            Ok(())
        }
    }

    fn remove(&mut self, _key: &str) -> StorageResult<()> {
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        Ok(())
    }
}
