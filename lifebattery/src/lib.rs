pub mod backend;
pub mod config;

pub use backend::domain;
pub use backend::storage;
pub use backend::{initialize_backend, AppState};
