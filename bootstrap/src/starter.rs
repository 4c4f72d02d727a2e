//! 服务启动器
//!
//! 提供统一的 HTTP 服务启动模式

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use config::{AppConfig, ServerConfig};
use errors::{AppError, AppResult};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::health::{HealthChecker, health_routes};
use crate::infrastructure::Infrastructure;
use crate::metrics::MetricsRecorder;
use crate::runtime::{init_runtime, shutdown_signal};

/// 运行 HTTP 服务
///
/// 这是所有 HTTP 服务的统一入口点。它负责：
/// 1. 加载配置
/// 2. 初始化运行时（日志、metrics）
/// 3. 创建基础设施资源（惰性 PostgreSQL 连接池）
/// 4. 调用用户提供的闭包构建业务路由
/// 5. 合并健康检查路由并套上并发、超时、请求体限制
/// 6. 启动服务器并处理 graceful shutdown
///
/// # 示例
///
/// ```ignore
/// use bootstrap::run_http;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     run_http("config", |infra| async move {
///         Ok(my_routes(infra.postgres_pool()))
///     }).await
/// }
/// ```
pub async fn run_http<F, Fut>(config_dir: &str, router_builder: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    // 1. 加载配置
    let config = AppConfig::load(config_dir)?;

    // 2. 初始化运行时
    init_runtime(&config);
    let metrics = Arc::new(MetricsRecorder::install()?);

    info!("Starting {} service", config.app_name);

    // 3. 创建基础设施
    let infra = Infrastructure::from_config(config.clone());
    let health_checker = Arc::new(HealthChecker::new(infra.postgres_pool()));

    // 4. 构建业务路由
    let routes = router_builder(infra.clone()).await?;

    // 5. 合并运维路由
    let app = apply_server_layers(routes.merge(health_routes(health_checker, metrics)), &config.server);

    let addr = server_addr(&config.server)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        %addr,
        max_concurrency = config.server.max_concurrency,
        "{} service running on port {}",
        config.app_name,
        addr.port()
    );

    // 6. 启动服务器
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 7. 清理
    infra.postgres_pool().close().await;

    info!("Service stopped");

    Ok(())
}

/// 解析监听地址
pub fn server_addr(server: &ServerConfig) -> AppResult<SocketAddr> {
    format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid server address {}:{}: {}",
                server.host, server.port, e
            ))
        })
}

/// 为路由套上服务级 layer
///
/// 并发上限在所有路由之间共享；超时返回 408；请求体超限返回 413
pub fn apply_server_layers(router: Router, server: &ServerConfig) -> Router {
    router
        .layer(RequestBodyLimitLayer::new(server.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs)))
        .layer(GlobalConcurrencyLimitLayer::new(server.max_concurrency))
        .layer(TraceLayer::new_for_http())
}
