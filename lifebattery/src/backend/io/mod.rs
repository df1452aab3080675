//! # IO Module
//!
//! Translation layer between the domain models and the `shared` records that
//! are persisted and handed to front ends.

pub mod mappers;

pub use mappers::profile_mapper::ProfileMapper;
pub use mappers::progress_mapper::ProgressMapper;
