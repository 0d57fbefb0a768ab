//! JSON seed files for the in-memory store.
//!
//! A seed file maps each domain to its flat list of category rows:
//!
//! ```json
//! {
//!   "lodging": [
//!     { "categoryId": "100", "localeId": "en_US", "localizedName": "Pools" },
//!     { "parentCategoryId": "100", "categoryId": "101", "localeId": "en_US", "localizedName": "Indoor Pool" }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use mediadb_storage::{CategoryRow, StorageError};
use serde::Deserialize;

use crate::storage::InMemoryCategoryStore;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SeedFile {
    pub domains: BTreeMap<String, Vec<CategoryRow>>,
}

impl SeedFile {
    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        serde_json::from_str(json)
            .map_err(|e| StorageError::invalid_row(format!("Failed to parse seed data: {e}")))
    }

    /// Loads every domain into a fresh store.
    pub fn into_store(self) -> InMemoryCategoryStore {
        let store = InMemoryCategoryStore::new();
        for (domain, rows) in self.domains {
            store.insert_rows(domain, rows);
        }
        store
    }
}

/// Reads a seed file from disk and builds a store from it.
pub fn load_seed_file(path: impl AsRef<Path>) -> Result<InMemoryCategoryStore, StorageError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| {
        StorageError::internal(format!("Failed to read seed file {}: {e}", path.display()))
    })?;
    let seed = SeedFile::from_json(&json)?;

    let store = seed.into_store();
    tracing::info!(
        path = %path.display(),
        domains = store.domain_count(),
        rows = store.row_count(),
        "Loaded category seed file"
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"{
        "lodging": [
            { "categoryId": "100", "localeId": "en_US", "localizedName": "Pools" },
            { "parentCategoryId": "100", "categoryId": "101", "localeId": "en_US", "localizedName": "Indoor Pool" }
        ],
        "cruise": [
            { "categoryId": "200", "localeId": "en_US", "localizedName": "Decks" }
        ]
    }"#;

    #[test]
    fn test_parse_seed() {
        let seed = SeedFile::from_json(SEED).expect("parse seed");
        assert_eq!(seed.domains.len(), 2);
        assert_eq!(seed.domains["lodging"][1].parent(), Some("100"));
    }

    #[test]
    fn test_load_seed_file() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("categories.json");
        std::fs::write(&path, SEED).expect("write seed");

        let store = load_seed_file(&path).expect("load seed");
        assert_eq!(store.domain_count(), 2);
        assert_eq!(store.row_count(), 3);
    }

    #[test]
    fn test_invalid_seed_is_rejected() {
        let err = SeedFile::from_json(r#"{"lodging": [{"categoryId": 1}]}"#)
            .expect_err("expected parse failure");
        assert!(err.to_string().starts_with("Invalid row: Failed to parse seed data"));

        let err = load_seed_file("/nonexistent/categories.json").expect_err("missing file");
        assert!(matches!(err, StorageError::Internal { .. }));
    }
}
