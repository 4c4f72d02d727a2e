//! API 层

mod handler;

use std::sync::Arc;

use axum::{Router, routing::post};

use crate::domain::OrderRepository;

pub use handler::{ORDER_RECORDED, record_order};

/// 请求处理共享状态
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn OrderRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self { repository }
    }
}

/// 订单路由
///
/// `/record` 只接受 POST，其他方法由路由直接返回 405 且不带正文
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/record", post(record_order))
        .with_state(state)
}
