//! # Domain Module
//!
//! Contains the business logic of the life battery, independent of any front
//! end or storage backend.
//!
//! ## Module Organization
//!
//! - **profile_store**: profiles, wish lists and the active selection,
//!   persisted through a key-value storage
//! - **migration**: one-time import of the legacy single-profile keys
//! - **life_progress**: pure birth date + lifespan arithmetic
//! - **progress_service**: the calculations bound to an injected clock
//! - **clock**: wall-clock abstraction
//! - **commands**: inputs of the store's mutating operations
//! - **models**: domain entities and errors
//!
//! ## Business Rules
//!
//! - Profile names are non-empty and lifespans positive
//! - The active profile always exists while any profile exists
//! - Legacy data is migrated at most once, and only into an empty store
//! - Remaining percentage is reported raw; renderers clamp it

pub mod clock;
pub mod commands;
pub mod life_progress;
pub mod migration;
pub mod models;
pub mod profile_store;
pub mod progress_service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use life_progress::{LifeProgress, ProgressError};
pub use profile_store::{ProfileStore, StoreResult, StoreSettings};
pub use progress_service::ProgressService;
