use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::MySqlPool;

use crate::config::{Config, StoreBackend};
use crate::store::{RestStore, SqlStore, StudentStore};

/// Builds the store selected by `STORE_BACKEND`.
pub async fn init_store(config: &Config) -> Result<Arc<dyn StudentStore>> {
    match config.store_backend {
        StoreBackend::Sql => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            let pool = MySqlPool::connect(url)
                .await
                .context("Failed to connect to database")?;
            Ok(Arc::new(SqlStore::new(pool)))
        }
        StoreBackend::Rest => {
            let url = config.rest_url.as_deref().context("REST_URL must be set")?;
            let key = config
                .rest_api_key
                .as_deref()
                .context("REST_API_KEY must be set")?;
            Ok(Arc::new(RestStore::new(url, key)))
        }
    }
}
