//! In-memory category row source for the MediaDB category service.
//!
//! This crate provides an in-memory implementation of the `CategoryRowSource`
//! trait from `mediadb-storage`, backed by a `DashMap` for concurrent access.
//! It is used for local development (seeded from a JSON file) and in tests.
//!
//! # Example
//!
//! ```ignore
//! use mediadb_db_memory::InMemoryCategoryStore;
//! use mediadb_storage::{CategoryRow, CategoryRowSource};
//!
//! let store = InMemoryCategoryStore::new();
//! store.insert_rows("lodging", vec![CategoryRow::top_level("100", "en_US", "Pools")]);
//! let rows = store.fetch_category_rows("lodging", Some("en_US")).await?;
//! ```

pub mod seed;
pub mod storage;

pub use mediadb_storage::{CategoryRow, CategoryRowSource, StorageError};

pub use seed::{SeedFile, load_seed_file};
pub use storage::InMemoryCategoryStore;

/// Creates a new, empty in-memory row source.
pub fn create_category_source() -> mediadb_storage::DynCategorySource {
    std::sync::Arc::new(InMemoryCategoryStore::new())
}
