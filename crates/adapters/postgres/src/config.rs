//! PostgreSQL 配置模块
//!
//! 按组件（主机、端口、库名、凭据）描述连接，连同连接池和超时设置

use sqlx::postgres::PgConnectOptions;
use std::time::Duration;

/// PostgreSQL 配置
#[derive(Clone)]
pub struct PostgresConfig {
    /// 主机
    pub host: String,
    /// 端口
    pub port: u16,
    /// 数据库名
    pub database: String,
    /// 用户名
    pub username: String,
    /// 密码
    pub password: Option<String>,

    // 连接池配置
    /// 最小连接数
    pub pool_min: u32,
    /// 最大连接数
    pub pool_max: u32,
    /// 空闲超时
    pub idle_timeout: Duration,
    /// 获取连接超时（包括建立新连接）
    pub acquire_timeout: Duration,

    /// 服务端语句超时
    pub statement_timeout: Option<Duration>,
    /// 应用名称（用于连接标识）
    pub application_name: Option<String>,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "postgres".to_string(),
            username: "postgres".to_string(),
            password: None,
            pool_min: 0,
            pool_max: 10,
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(30),
            statement_timeout: None,
            application_name: None,
        }
    }
}

// 手写 Debug，避免密码出现在日志里
impl std::fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("pool_min", &self.pool_min)
            .field("pool_max", &self.pool_max)
            .field("idle_timeout", &self.idle_timeout)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("statement_timeout", &self.statement_timeout)
            .field("application_name", &self.application_name)
            .finish()
    }
}

impl PostgresConfig {
    /// 从组件创建配置
    pub fn from_components(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            database: database.into(),
            username: username.into(),
            ..Default::default()
        }
    }

    /// 设置密码
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// 设置连接池配置
    pub fn with_pool(mut self, min: u32, max: u32) -> Self {
        self.pool_min = min;
        self.pool_max = max;
        self
    }

    /// 设置获取连接超时
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// 设置语句超时
    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = Some(timeout);
        self
    }

    /// 设置应用名称
    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    /// 不含密码的连接描述，用于日志
    pub fn display_url(&self) -> String {
        format!(
            "postgres://{}@{}:{}/{}",
            self.username, self.host, self.port, self.database
        )
    }

    /// 构建 sqlx 连接参数
    ///
    /// 密码直接作为参数传入，不经过 URL 编码
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.username);

        if let Some(ref password) = self.password {
            options = options.password(password);
        }

        if let Some(ref app_name) = self.application_name {
            options = options.application_name(app_name);
        }

        if let Some(timeout) = self.statement_timeout {
            options = options.options([("statement_timeout", timeout.as_millis().to_string())]);
        }

        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PostgresConfig::default();
        assert_eq!(config.pool_min, 0);
        assert_eq!(config.pool_max, 10);
        assert_eq!(config.port, 5432);
        assert!(config.statement_timeout.is_none());
    }

    #[test]
    fn test_config_from_components() {
        let config = PostgresConfig::from_components("db.example.com", 5433, "emartdb", "emartuser")
            .with_password("emartpass")
            .with_pool(1, 20)
            .with_application_name("ledger");

        assert_eq!(config.host, "db.example.com");
        assert_eq!(config.port, 5433);
        assert_eq!(config.database, "emartdb");
        assert_eq!(config.username, "emartuser");
        assert_eq!(config.password, Some("emartpass".to_string()));
        assert_eq!(config.pool_max, 20);
        assert_eq!(config.application_name, Some("ledger".to_string()));
    }

    #[test]
    fn test_display_url_hides_password() {
        let config = PostgresConfig::from_components("localhost", 5432, "emartdb", "emartuser")
            .with_password("emartpass");

        assert_eq!(config.display_url(), "postgres://emartuser@localhost:5432/emartdb");
        assert!(!format!("{:?}", config).contains("emartpass"));
    }

    #[test]
    fn test_connect_options() {
        let options = PostgresConfig::from_components("db", 6543, "emartdb", "emartuser")
            .with_password("p@ss/word")
            .with_statement_timeout(Duration::from_secs(10))
            .connect_options();

        assert_eq!(options.get_host(), "db");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("emartdb"));
        assert_eq!(options.get_username(), "emartuser");
        assert_eq!(options.get_options(), Some("-c statement_timeout=10000"));
    }
}
