//! # mediadb-catalog
//!
//! Domain category hierarchy builder and subcategory existence cache.
//!
//! The category table of the MediaDB is a flat adjacency list: one row per
//! `(node, locale)` pair, with child rows pointing at their parent. This crate
//! turns those rows into a sorted two-level tree ([`HierarchyBuilder`]) and
//! keeps a time-boxed set of legal subcategory ids ([`SubcategoryCache`]) for
//! fast validation of incoming requests.
//!
//! ```ignore
//! use std::sync::Arc;
//! use mediadb_catalog::CategoryService;
//! use mediadb_db_memory::InMemoryCategoryStore;
//!
//! let service = CategoryService::new(Arc::new(InMemoryCategoryStore::new()));
//! let tree = service.category_tree("lodging", Some("en_US")).await?;
//! let legal = service.subcategory_exists("lodging", Some("en_US"), "101").await?;
//! ```

pub mod cache;
pub mod clock;
pub mod hierarchy;
pub mod model;
pub mod service;

pub use cache::{
    CacheStatsSnapshot, DEFAULT_SUBCATEGORY_TTL, NEVER_EXPIRES, SubcategoryCache,
    SubcategorySnapshot,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use hierarchy::{HierarchyBuilder, NamePolicy, build_hierarchy, subcategory_ids};
pub use model::{Category, LocalizedName, Subcategory};
pub use service::{CatalogSettings, CategoryService};
