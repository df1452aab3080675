//! # Backend Module
//!
//! Contains all non-UI logic of the life battery.
//!
//! ## Architecture
//!
//! ```text
//! Front end (CLI, mobile shell)
//!     ↓
//! IO Layer (mappers to shared records)
//!     ↓
//! Domain Layer (profile store, life progress)
//!     ↓
//! Storage Layer (key-value storage)
//! ```

pub mod domain;
pub mod io;
pub mod storage;

use log::info;

use crate::config::AppConfig;
use domain::{ProfileStore, ProgressService, SystemClock};
use storage::FileStorage;

/// Services the front end works with
pub struct AppState {
    pub profile_store: ProfileStore<FileStorage, SystemClock>,
    pub progress_service: ProgressService<SystemClock>,
}

/// Initialize the backend against the configured data directory
pub fn initialize_backend(config: &AppConfig) -> anyhow::Result<AppState> {
    let data_directory = config.resolve_data_directory()?;
    info!("Setting up storage in {}", data_directory.display());
    let storage = FileStorage::new(&data_directory)?;

    info!("Setting up domain model");
    let profile_store = ProfileStore::open(storage, SystemClock, config.store_settings());
    let progress_service = ProgressService::new(SystemClock);

    Ok(AppState {
        profile_store,
        progress_service,
    })
}
