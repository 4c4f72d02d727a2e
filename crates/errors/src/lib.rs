//! errors - 统一错误处理
//!
//! 每个变体对应一类失败来源，`kind()` 提供稳定的标签供日志和 metrics 使用。

use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 请求内容无法解析或字段不合法
    #[error("Validation error: {0}")]
    Validation(String),

    /// 无法连接或认证到存储
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// 建表或写入失败
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// 错误分类标签
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Unavailable(_) => "unavailable",
            Self::Database(_) => "database",
            Self::Configuration(_) => "configuration",
        }
    }

    /// 是否为调用方输入导致的错误
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;
