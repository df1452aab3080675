use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::traits::{KeyValueStorage, StorageError, StorageResult};

const VALUE_EXTENSION: &str = "json";

/// FileStorage keeps one `<key>.json` file per key inside a data directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_directory: PathBuf,
}

impl FileStorage {
    /// Create a new file storage rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> StorageResult<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|source| StorageError::Io {
                key: base_path.display().to_string(),
                source,
            })?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Convert a storage key into a safe file stem
    /// "lifebattery_profiles" stays as is, "a/b c" becomes "a_b_c"
    pub fn safe_file_stem(key: &str) -> String {
        key.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.base_directory
            .join(Self::safe_file_stem(key))
            .with_extension(VALUE_EXTENSION)
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.value_path(key);

        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No stored value for key {}", key);
                Ok(None)
            }
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.value_path(key);
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        // Atomic write using temp file
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, value).map_err(io_err)?;
        fs::rename(&temp_path, &path).map_err(io_err)?;

        debug!("Wrote key {} to {}", key, path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let path = self.value_path(key);

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn clear(&mut self) -> StorageResult<()> {
        let entries = fs::read_dir(&self.base_directory).map_err(|source| StorageError::Io {
            key: self.base_directory.display().to_string(),
            source,
        })?;

        let mut removed = 0;
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn!("Skipping unreadable entry while clearing storage: {}", e);
                    continue;
                }
            };

            // Only files this storage wrote; config.yaml and friends stay
            if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(VALUE_EXTENSION) {
                fs::remove_file(&path).map_err(|source| StorageError::Io {
                    key: path.display().to_string(),
                    source,
                })?;
                removed += 1;
            }
        }

        info!("Cleared {} stored values from {}", removed, self.base_directory.display());
        Ok(())
    }
}
