use async_trait::async_trait;
use dashmap::DashMap;
use mediadb_storage::{CategoryRow, CategoryRowSource, StorageError};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// In-memory category table keyed by domain.
///
/// Rows are kept exactly as inserted, duplicates included, so the store
/// behaves like a denormalized table with no uniqueness constraint.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCategoryStore {
    rows: Arc<DashMap<String, Vec<CategoryRow>>>,
}

impl InMemoryCategoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `rows` for `domain`.
    pub fn with_rows(domain: impl Into<String>, rows: Vec<CategoryRow>) -> Self {
        let store = Self::new();
        store.insert_rows(domain, rows);
        store
    }

    /// Appends rows to a domain's table.
    pub fn insert_rows(&self, domain: impl Into<String>, rows: Vec<CategoryRow>) {
        self.rows.entry(domain.into()).or_default().extend(rows);
    }

    /// Replaces a domain's table wholesale.
    pub fn replace_rows(&self, domain: impl Into<String>, rows: Vec<CategoryRow>) {
        self.rows.insert(domain.into(), rows);
    }

    /// Number of domains with at least one stored row.
    pub fn domain_count(&self) -> usize {
        self.rows.len()
    }

    /// Total number of stored rows across every domain.
    pub fn row_count(&self) -> usize {
        self.rows.iter().map(|entry| entry.value().len()).sum()
    }
}

#[async_trait]
impl CategoryRowSource for InMemoryCategoryStore {
    async fn fetch_category_rows(
        &self,
        domain: &str,
        locale_id: Option<&str>,
    ) -> Result<Vec<CategoryRow>, StorageError> {
        let Some(rows) = self.rows.get(domain) else {
            tracing::debug!(domain, "No rows stored for domain");
            return Ok(Vec::new());
        };

        let fetched: Vec<CategoryRow> = match locale_id {
            Some(locale) => localized_rows(&rows, locale),
            None => rows.clone(),
        };

        tracing::trace!(domain, ?locale_id, rows = fetched.len(), "Fetched category rows");
        Ok(fetched)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Rows of `locale`, plus one linkage row for every parent/child edge that
/// has no translation in `locale`.
///
/// The linkage row is the edge's row with the lowest locale id, so the
/// subcategory stays in the tree under a fallback name.
fn localized_rows(rows: &[CategoryRow], locale: &str) -> Vec<CategoryRow> {
    let mut fetched: Vec<CategoryRow> = Vec::new();
    let mut translated: HashSet<(&str, &str)> = HashSet::new();
    for row in rows.iter().filter(|row| row.locale_id == locale) {
        if let Some(parent) = row.parent() {
            translated.insert((parent, row.category_id.as_str()));
        }
        fetched.push(row.clone());
    }

    let mut linkage: BTreeMap<(&str, &str), &CategoryRow> = BTreeMap::new();
    for row in rows {
        let Some(parent) = row.parent() else { continue };
        let edge = (parent, row.category_id.as_str());
        if translated.contains(&edge) {
            continue;
        }
        linkage
            .entry(edge)
            .and_modify(|best| {
                if row.locale_id < best.locale_id {
                    *best = row;
                }
            })
            .or_insert(row);
    }

    fetched.extend(linkage.into_values().cloned());
    fetched
}
