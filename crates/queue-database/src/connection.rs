//! 数据库连接管理

use std::time::Duration;

use queue_core::{QueueError, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};

/// 数据库连接池
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// 建立连接池
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .map_err(|e| QueueError::Database(e.to_string()))?;

        tracing::info!("Database pool established (max_connections={})", max_connections);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
