//! Time-boxed subcategory existence cache.
//!
//! Holds a single immutable [`SubcategorySnapshot`] behind an `ArcSwapOption`.
//! Readers take one atomic load and never block; a rebuild installs a fresh
//! snapshot with one atomic store. Two callers racing past an expired snapshot
//! may both rebuild; the last store wins and no reader ever sees a set without
//! its matching expiry.
//!
//! ```text
//! EMPTY --lookup--> FRESH --ttl elapses--> STALE --lookup--> FRESH ...
//! ```
//!
//! EMPTY and STALE behave the same: the next non-blank lookup rebuilds.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwapOption;
use mediadb_storage::{DynCategorySource, StorageResult};
use serde::Serialize;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};
use tracing::{info, trace, warn};

use crate::clock::{Clock, SystemClock};
use crate::hierarchy::{HierarchyBuilder, subcategory_ids};

/// Default snapshot lifetime.
pub const DEFAULT_SUBCATEGORY_TTL: Duration = Duration::hours(24);

/// Expiry used when `built_at + ttl` is past the last representable instant.
pub const NEVER_EXPIRES: OffsetDateTime = PrimitiveDateTime::MAX.assume_utc();

fn expiry_after(built_at: OffsetDateTime, ttl: Duration) -> OffsetDateTime {
    match built_at.checked_add(ttl) {
        Some(expiry) => expiry,
        None if ttl.is_negative() => built_at,
        None => NEVER_EXPIRES,
    }
}

/// Subcategory ids of one domain/locale, valid until `expiry`.
#[derive(Debug, Clone)]
pub struct SubcategorySnapshot {
    pub domain: String,
    pub locale_id: Option<String>,
    pub ids: HashSet<String>,
    pub built_at: OffsetDateTime,
    pub expiry: OffsetDateTime,
}

impl SubcategorySnapshot {
    pub fn contains(&self, subcategory_id: &str) -> bool {
        self.ids.contains(subcategory_id)
    }

    /// Expiry must be strictly after `now`.
    pub fn is_fresh(&self, now: OffsetDateTime) -> bool {
        self.expiry > now
    }

    fn serves(&self, domain: &str, locale_id: Option<&str>, now: OffsetDateTime) -> bool {
        self.is_fresh(now) && self.domain == domain && self.locale_id.as_deref() == locale_id
    }
}

#[derive(Debug, Default)]
struct CacheStats {
    hits: AtomicU64,
    rebuilds: AtomicU64,
    failures: AtomicU64,
    bypasses: AtomicU64,
}

/// Point-in-time view of the cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStatsSnapshot {
    /// Lookups answered from a fresh snapshot.
    pub hits: u64,
    /// Snapshot rebuilds attempted (each one is a row fetch).
    pub rebuilds: u64,
    /// Rebuilds that failed because the fetch failed.
    pub failures: u64,
    /// Blank candidates answered without touching the cache.
    pub bypasses: u64,
}

/// Answers "is this subcategory id legal for the domain?" from a cached id set.
pub struct SubcategoryCache {
    source: DynCategorySource,
    builder: HierarchyBuilder,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    snapshot: ArcSwapOption<SubcategorySnapshot>,
    stats: CacheStats,
}

impl SubcategoryCache {
    /// Creates a cache on the system clock with the default 24h TTL.
    pub fn new(source: DynCategorySource) -> Self {
        Self {
            source,
            builder: HierarchyBuilder::new(),
            clock: Arc::new(SystemClock),
            ttl: DEFAULT_SUBCATEGORY_TTL,
            snapshot: ArcSwapOption::empty(),
            stats: CacheStats::default(),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_builder(mut self, builder: HierarchyBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns whether `candidate_id` names a subcategory of `domain`.
    ///
    /// A blank candidate means "no constraint given" and is always accepted
    /// without consulting the cache. Otherwise a missing, expired, or
    /// foreign-scope snapshot is rebuilt before answering.
    ///
    /// # Errors
    ///
    /// Returns the row source's error unchanged when a rebuild fetch fails.
    /// The previous snapshot, if any, is left in place.
    pub async fn exists(
        &self,
        candidate_id: &str,
        domain: &str,
        locale_id: Option<&str>,
    ) -> StorageResult<bool> {
        if candidate_id.trim().is_empty() {
            self.stats.bypasses.fetch_add(1, Ordering::Relaxed);
            return Ok(true);
        }

        let now = self.clock.now();
        if let Some(snapshot) = self.snapshot.load_full()
            && snapshot.serves(domain, locale_id, now)
        {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            trace!(domain, candidate_id, "Subcategory cache hit");
            return Ok(snapshot.contains(candidate_id));
        }

        let snapshot = self.rebuild(domain, locale_id).await?;
        Ok(snapshot.contains(candidate_id))
    }

    async fn rebuild(
        &self,
        domain: &str,
        locale_id: Option<&str>,
    ) -> StorageResult<Arc<SubcategorySnapshot>> {
        self.stats.rebuilds.fetch_add(1, Ordering::Relaxed);

        let rows = match self.source.fetch_category_rows(domain, locale_id).await {
            Ok(rows) => rows,
            Err(e) => {
                self.stats.failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    domain,
                    ?locale_id,
                    error = %e,
                    category = %e.category(),
                    "Subcategory cache rebuild failed"
                );
                return Err(e);
            }
        };

        let ids = subcategory_ids(&self.builder.build(&rows));
        let built_at = self.clock.now();
        let snapshot = Arc::new(SubcategorySnapshot {
            domain: domain.to_string(),
            locale_id: locale_id.map(str::to_string),
            ids,
            built_at,
            expiry: expiry_after(built_at, self.ttl),
        });
        self.snapshot.store(Some(Arc::clone(&snapshot)));

        info!(
            domain,
            ?locale_id,
            rows = rows.len(),
            ids = snapshot.ids.len(),
            backend = self.source.backend_name(),
            "Subcategory cache rebuilt"
        );
        Ok(snapshot)
    }

    /// Drops the current snapshot so the next lookup rebuilds.
    pub fn invalidate(&self) {
        self.snapshot.store(None);
        info!("Subcategory cache invalidated");
    }

    /// The installed snapshot, fresh or not.
    pub fn snapshot(&self) -> Option<Arc<SubcategorySnapshot>> {
        self.snapshot.load_full()
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.stats.hits.load(Ordering::Relaxed),
            rebuilds: self.stats.rebuilds.load(Ordering::Relaxed),
            failures: self.stats.failures.load(Ordering::Relaxed),
            bypasses: self.stats.bypasses.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for SubcategoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubcategoryCache")
            .field("backend", &self.source.backend_name())
            .field("ttl", &self.ttl)
            .field("populated", &self.snapshot.load().is_some())
            .finish()
    }
}
