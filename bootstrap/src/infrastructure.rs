//! 基础设施资源管理
//!
//! 统一管理服务共享的基础设施资源

use std::sync::Arc;
use std::time::Duration;

use adapter_postgres::{PostgresConfig, create_lazy_pool};
use config::{AppConfig, DatabaseConfig};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

/// 基础设施资源容器
///
/// 由 bootstrap 在启动时创建一次，克隆开销很小
#[derive(Clone)]
pub struct Infrastructure {
    /// 应用配置
    config: Arc<AppConfig>,
    /// PostgreSQL 连接池
    postgres_pool: PgPool,
}

impl Infrastructure {
    /// 从配置创建基础设施资源
    ///
    /// 连接池是惰性的：这里不会连接数据库，连接在第一次请求时建立
    pub fn from_config(config: AppConfig) -> Self {
        let pg_config = postgres_config(&config.app_name, &config.database);
        let postgres_pool = create_lazy_pool(&pg_config);
        info!(
            url = %pg_config.display_url(),
            max_connections = pg_config.pool_max,
            "PostgreSQL connection pool configured"
        );

        Self {
            config: Arc::new(config),
            postgres_pool,
        }
    }

    /// 获取应用配置
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 获取 PostgreSQL 连接池
    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }
}

/// 把应用层的数据库配置转换为适配器配置
pub fn postgres_config(app_name: &str, database: &DatabaseConfig) -> PostgresConfig {
    PostgresConfig::from_components(
        database.host.as_str(),
        database.port,
        database.name.as_str(),
        database.user.as_str(),
    )
    .with_password(database.password.expose_secret().as_str())
    .with_pool(0, database.max_connections)
    .with_acquire_timeout(Duration::from_secs(database.acquire_timeout_secs))
    .with_statement_timeout(Duration::from_secs(database.statement_timeout_secs))
    .with_application_name(app_name)
}
