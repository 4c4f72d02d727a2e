//! 订单仓储接口

use async_trait::async_trait;
use errors::AppResult;

use super::order::{NewOrder, RecordedOrder};

/// 订单仓储接口
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 确保 orders 表存在（幂等）
    async fn ensure_schema(&self) -> AppResult<()>;

    /// 写入一笔订单，返回存储分配的 id 和时间
    ///
    /// 每次调用独占一个连接，任何路径返回前都会释放
    async fn record(&self, order: &NewOrder) -> AppResult<RecordedOrder>;
}
