//! Caller-facing category operations.

use std::sync::Arc;

use mediadb_storage::{DynCategorySource, StorageResult};
use time::Duration;
use tracing::{debug, instrument};

use crate::cache::{DEFAULT_SUBCATEGORY_TTL, SubcategoryCache};
use crate::clock::{Clock, SystemClock};
use crate::hierarchy::{HierarchyBuilder, NamePolicy};
use crate::model::Category;

/// Tunables for [`CategoryService`].
#[derive(Debug, Clone, Copy)]
pub struct CatalogSettings {
    pub subcategory_ttl: Duration,
    pub name_policy: NamePolicy,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            subcategory_ttl: DEFAULT_SUBCATEGORY_TTL,
            name_policy: NamePolicy::Append,
        }
    }
}

/// Category tree listing and subcategory validation for one row source.
///
/// Tree listings always read fresh rows; existence checks go through the
/// shared [`SubcategoryCache`].
#[derive(Clone)]
pub struct CategoryService {
    source: DynCategorySource,
    builder: HierarchyBuilder,
    cache: Arc<SubcategoryCache>,
}

impl CategoryService {
    pub fn new(source: DynCategorySource) -> Self {
        Self::with_settings(source, CatalogSettings::default())
    }

    pub fn with_settings(source: DynCategorySource, settings: CatalogSettings) -> Self {
        Self::with_clock(source, settings, Arc::new(SystemClock))
    }

    pub fn with_clock(
        source: DynCategorySource,
        settings: CatalogSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let builder = HierarchyBuilder::with_policy(settings.name_policy);
        let cache = SubcategoryCache::new(source.clone())
            .with_builder(builder)
            .with_ttl(settings.subcategory_ttl)
            .with_clock(clock);
        Self {
            source,
            builder,
            cache: Arc::new(cache),
        }
    }

    /// Builds the full category tree for `domain` from a fresh fetch.
    ///
    /// `locale_id = None` includes every locale.
    #[instrument(skip(self), fields(backend = self.source.backend_name()))]
    pub async fn category_tree(
        &self,
        domain: &str,
        locale_id: Option<&str>,
    ) -> StorageResult<Vec<Category>> {
        let rows = self.source.fetch_category_rows(domain, locale_id).await?;
        let tree = self.builder.build(&rows);
        debug!(rows = rows.len(), categories = tree.len(), "Built category tree");
        Ok(tree)
    }

    /// Checks `candidate_id` against the cached subcategory ids of `domain`.
    pub async fn subcategory_exists(
        &self,
        domain: &str,
        locale_id: Option<&str>,
        candidate_id: &str,
    ) -> StorageResult<bool> {
        self.cache.exists(candidate_id, domain, locale_id).await
    }

    pub fn cache(&self) -> &SubcategoryCache {
        &self.cache
    }

    pub fn backend_name(&self) -> &'static str {
        self.source.backend_name()
    }
}

impl std::fmt::Debug for CategoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryService")
            .field("backend", &self.source.backend_name())
            .field("builder", &self.builder)
            .field("cache", &self.cache)
            .finish()
    }
}
