#![forbid(unsafe_code)]

pub mod fixtures;
pub mod repository;

pub use fixtures::{FixtureError, seed_demo};
pub use repository::{InMemoryRepository, Storage, StorageError};
