//! Failures of the PostgreSQL category source.

use mediadb_storage::StorageError;
use sqlx_core::error::Error as SqlxError;

/// SQLSTATE for "relation does not exist".
const UNDEFINED_TABLE: &str = "42P01";

/// Errors raised while opening the pool.
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    #[error("invalid PostgreSQL settings: {0}")]
    Config(String),

    #[error("PostgreSQL connection failed: {0}")]
    Connect(#[from] SqlxError),
}

impl From<PostgresError> for StorageError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::Config(message) => StorageError::internal(message),
            PostgresError::Connect(e) => StorageError::connection_error(e.to_string()),
        }
    }
}

/// Classifies a failed category row query.
///
/// Rows that cannot be decoded are data problems, a missing table is a
/// deployment problem, and everything else is treated as the database being
/// unreachable.
pub(crate) fn query_failure(err: SqlxError, table: &str) -> StorageError {
    match &err {
        SqlxError::Database(db) if db.code().as_deref() == Some(UNDEFINED_TABLE) => {
            StorageError::internal(format!("Category table '{table}' does not exist"))
        }
        SqlxError::ColumnDecode { .. }
        | SqlxError::Decode(_)
        | SqlxError::ColumnNotFound(_)
        | SqlxError::ColumnIndexOutOfBounds { .. }
        | SqlxError::TypeNotFound { .. } => {
            StorageError::invalid_row(format!("Malformed row in '{table}': {err}"))
        }
        _ => StorageError::connection_error(format!("Failed to fetch category rows: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediadb_storage::ErrorCategory;

    #[test]
    fn null_column_is_a_data_error() {
        let err = SqlxError::ColumnDecode {
            index: "\"category_id\"".into(),
            source: "unexpected null; try decoding as an `Option`".into(),
        };
        let mapped = query_failure(err, "media_category");
        assert_eq!(mapped.category(), ErrorCategory::Data);
        assert!(!mapped.is_connection_error());
    }

    #[test]
    fn missing_column_is_a_data_error() {
        let mapped = query_failure(SqlxError::ColumnNotFound("locale_id".into()), "media_category");
        assert_eq!(mapped.category(), ErrorCategory::Data);
    }

    #[test]
    fn pool_timeout_is_a_connection_error() {
        let mapped = query_failure(SqlxError::PoolTimedOut, "media_category");
        assert!(mapped.is_connection_error());
    }

    #[test]
    fn config_error_is_internal() {
        let err: StorageError = PostgresError::Config("max_connections must be > 0".into()).into();
        assert_eq!(err.category(), ErrorCategory::Internal);
    }
}
