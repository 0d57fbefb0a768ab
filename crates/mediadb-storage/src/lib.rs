//! # mediadb-storage
//!
//! Row source abstraction for the MediaDB category service.
//!
//! This crate defines the contract every backing store must satisfy to feed
//! the category hierarchy builder. It does not contain any implementations -
//! those live in `mediadb-db-memory` and `mediadb-db-postgres`.
//!
//! ## Overview
//!
//! The main trait is [`CategoryRowSource`], which returns the flat,
//! denormalized category rows stored for a domain:
//!
//! ```ignore
//! use mediadb_storage::{CategoryRowSource, StorageError};
//!
//! async fn english_rows(
//!     source: &dyn CategoryRowSource,
//! ) -> Result<usize, StorageError> {
//!     let rows = source.fetch_category_rows("lodging", Some("en_US")).await?;
//!     Ok(rows.len())
//! }
//! ```

mod error;
mod traits;
mod types;

pub use error::{ErrorCategory, StorageError};
pub use traits::CategoryRowSource;
pub use types::CategoryRow;

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared row source trait object.
pub type DynCategorySource = std::sync::Arc<dyn CategoryRowSource>;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{ErrorCategory, StorageError};
    pub use crate::traits::CategoryRowSource;
    pub use crate::types::CategoryRow;
    pub use crate::{DynCategorySource, StorageResult};
}
