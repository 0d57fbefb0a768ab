//! PostgreSQL implementation of `CategoryRowSource`.

use async_trait::async_trait;
use sqlx_postgres::PgPool;
use tracing::{debug, instrument};

use mediadb_storage::{CategoryRow, CategoryRowSource, StorageError};

use crate::connection::PostgresConfig;
use crate::error::PostgresError;
use crate::queries;

/// Read-only row source over the relational MediaDB.
#[derive(Debug, Clone)]
pub struct PostgresCategoryStore {
    pool: PgPool,
}

impl PostgresCategoryStore {
    /// Opens a pool for `config` and checks connectivity.
    pub async fn connect(config: &PostgresConfig) -> Result<Self, PostgresError> {
        let pool = config.connect().await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl CategoryRowSource for PostgresCategoryStore {
    #[instrument(skip(self), fields(backend = "postgres"))]
    async fn fetch_category_rows(
        &self,
        domain: &str,
        locale_id: Option<&str>,
    ) -> Result<Vec<CategoryRow>, StorageError> {
        let rows = queries::fetch_category_rows(&self.pool, domain, locale_id).await?;
        debug!(rows = rows.len(), "Fetched category rows");
        Ok(rows)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
