//! PostgreSQL 连接管理

use errors::{AppError, AppResult};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::debug;

use crate::config::PostgresConfig;

fn pool_options(config: &PostgresConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.pool_max)
        .min_connections(config.pool_min)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
}

/// 创建惰性连接池
///
/// 不在创建时连接，首次 acquire 时才建立连接，数据库不可用时服务依然可以启动
pub fn create_lazy_pool(config: &PostgresConfig) -> PgPool {
    debug!(url = %config.display_url(), "Creating lazy PostgreSQL pool");
    pool_options(config).connect_lazy_with(config.connect_options())
}

/// 检查数据库连接
pub async fn check_connection(pool: &PgPool) -> AppResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| AppError::unavailable(format!("Database health check failed: {}", e)))?;
    Ok(())
}
