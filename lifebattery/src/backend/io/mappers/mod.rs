pub mod profile_mapper;
pub mod progress_mapper;
