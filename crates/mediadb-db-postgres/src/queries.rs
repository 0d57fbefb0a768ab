//! Category table queries.
//!
//! The MediaDB category table stores one row per `(category, locale)` pair.
//! Top-level categories carry a NULL or empty `parent_category_id`.

use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;

use mediadb_storage::{CategoryRow, StorageError};

use crate::error::query_failure;

/// Name of the category table read by this backend.
pub const CATEGORY_TABLE: &str = "media_category";

/// Raw column tuple: parent id, category id, locale id, localized name.
type CategoryRecord = (Option<String>, String, String, String);

/// Builds the select statement used by [`fetch_category_rows`].
///
/// A NULL locale parameter matches every locale. With a locale, the second
/// branch adds one linkage row (lowest locale id) for every parent/child edge
/// that has no translation in that locale, so the tree keeps its shape.
pub fn category_rows_sql() -> String {
    format!(
        r#"(SELECT parent_category_id, category_id, locale_id, localized_name
            FROM {CATEGORY_TABLE}
            WHERE domain = $1
              AND ($2::text IS NULL OR locale_id = $2))
           UNION ALL
           (SELECT DISTINCT ON (edge.parent_category_id, edge.category_id)
                   edge.parent_category_id, edge.category_id, edge.locale_id, edge.localized_name
            FROM {CATEGORY_TABLE} AS edge
            WHERE edge.domain = $1
              AND $2::text IS NOT NULL
              AND edge.parent_category_id IS NOT NULL
              AND edge.parent_category_id <> ''
              AND NOT EXISTS (
                  SELECT 1 FROM {CATEGORY_TABLE} AS translated
                  WHERE translated.domain = edge.domain
                    AND translated.parent_category_id = edge.parent_category_id
                    AND translated.category_id = edge.category_id
                    AND translated.locale_id = $2)
            ORDER BY edge.parent_category_id, edge.category_id, edge.locale_id)"#
    )
}

/// Fetches the category rows of `domain`, optionally restricted to one locale
/// plus the linkage rows that locale is missing.
pub async fn fetch_category_rows(
    pool: &PgPool,
    domain: &str,
    locale_id: Option<&str>,
) -> Result<Vec<CategoryRow>, StorageError> {
    let sql = category_rows_sql();
    let records: Vec<CategoryRecord> = query_as(&sql)
        .bind(domain)
        .bind(locale_id)
        .fetch_all(pool)
        .await
        .map_err(|e| query_failure(e, CATEGORY_TABLE))?;

    Ok(records.into_iter().map(into_row).collect())
}

fn into_row(record: CategoryRecord) -> CategoryRow {
    let (parent_category_id, category_id, locale_id, localized_name) = record;
    CategoryRow {
        parent_category_id,
        category_id,
        locale_id,
        localized_name,
    }
}
