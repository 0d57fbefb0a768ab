//! Row source trait implemented by every backing store.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::types::CategoryRow;

/// Read-only access to the flat category table of a backing store.
///
/// Implementations must be thread-safe (`Send + Sync`) and must never mutate
/// the underlying store.
///
/// # Example
///
/// ```ignore
/// use mediadb_storage::{CategoryRowSource, StorageError};
///
/// async fn all_locales(source: &dyn CategoryRowSource) -> Result<(), StorageError> {
///     let rows = source.fetch_category_rows("lodging", None).await?;
///     println!("{} rows", rows.len());
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait CategoryRowSource: Send + Sync {
    /// Fetches the category rows stored for `domain`.
    ///
    /// When `locale_id` is `None`, rows for every locale are returned. When it
    /// is `Some`, only rows in that locale are returned; each child row still
    /// carries its `parent_category_id`, so the structure can be rebuilt.
    ///
    /// Rows are returned in no particular order.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure or decoding issues. A domain
    /// with no rows yields an empty vector.
    async fn fetch_category_rows(
        &self,
        domain: &str,
        locale_id: Option<&str>,
    ) -> Result<Vec<CategoryRow>, StorageError>;

    /// Returns the name of this backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}
