//! 订单写入处理器

use std::time::Instant;

use axum::{body::Bytes, extract::State};
use errors::AppResult;
use metrics::{counter, histogram};
use tracing::{error, info, warn};

use super::AppState;
use crate::domain::{NewOrder, RecordedOrder};
use crate::error::ApiError;

/// 成功响应正文
pub const ORDER_RECORDED: &str = "Order recorded";

/// POST /record
pub async fn record_order(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<&'static str, ApiError> {
    let started = Instant::now();
    let result = process(&state, &body).await;
    histogram!("ledger_record_duration_ms").record(started.elapsed().as_secs_f64() * 1000.0);

    match result {
        Ok(recorded) => {
            counter!("ledger_orders_recorded_total").increment(1);
            info!(order_id = recorded.id, order_date = %recorded.order_date, "Order recorded");
            Ok(ORDER_RECORDED)
        }
        Err(e) => {
            counter!("ledger_orders_failed_total", "kind" => e.kind()).increment(1);
            if e.is_client_error() {
                warn!(error = %e, kind = e.kind(), "Rejected order");
            } else {
                error!(error = %e, kind = e.kind(), "Failed to record order");
            }
            Err(e.into())
        }
    }
}

async fn process(state: &AppState, body: &[u8]) -> AppResult<RecordedOrder> {
    let order = NewOrder::from_json(body)?;
    info!(
        user_id = %order.user_id,
        name = %order.name,
        quantity = order.quantity,
        "Received order"
    );

    state.repository.record(&order).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes;
    use crate::domain::OrderRepository;
    use crate::error::ERROR_PREFIX;
    use async_trait::async_trait;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
    };
    use chrono::Utc;
    use errors::AppError;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    /// 内存仓储，模拟自增 id
    #[derive(Default)]
    struct InMemoryOrderRepository {
        rows: Mutex<Vec<(i32, NewOrder)>>,
    }

    #[async_trait]
    impl OrderRepository for InMemoryOrderRepository {
        async fn ensure_schema(&self) -> AppResult<()> {
            Ok(())
        }

        async fn record(&self, order: &NewOrder) -> AppResult<RecordedOrder> {
            let mut rows = self.rows.lock().unwrap();
            let id = rows.len() as i32 + 1;
            rows.push((id, order.clone()));
            Ok(RecordedOrder {
                id,
                order_date: Utc::now().naive_utc(),
            })
        }
    }

    struct FailingOrderRepository;

    #[async_trait]
    impl OrderRepository for FailingOrderRepository {
        async fn ensure_schema(&self) -> AppResult<()> {
            Err(AppError::unavailable("connection refused"))
        }

        async fn record(&self, _order: &NewOrder) -> AppResult<RecordedOrder> {
            Err(AppError::unavailable("Failed to connect to database: connection refused"))
        }
    }

    const WIDGET: &str = r#"{"user_id":"u1","product_id":"p1","name":"Widget","quantity":3,"price":9.99,"total_amount":29.97}"#;

    fn app(repository: Arc<dyn OrderRepository>) -> Router {
        routes(AppState::new(repository))
    }

    fn request(method: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri("/record")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_record_valid_order() {
        let repo = Arc::new(InMemoryOrderRepository::default());
        let response = app(repo.clone()).oneshot(request("POST", WIDGET)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "14");
        assert_eq!(body_text(response).await, ORDER_RECORDED);

        let rows = repo.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        let order = &rows[0].1;
        assert_eq!(order.user_id, "u1");
        assert_eq!(order.product_id, "p1");
        assert_eq!(order.name, "Widget");
        assert_eq!(order.quantity, 3);
        assert_eq!(order.price, Decimal::from_str("9.99").unwrap());
        assert_eq!(order.total_amount, Decimal::from_str("29.97").unwrap());
    }

    #[tokio::test]
    async fn test_other_methods_not_allowed() {
        let repo = Arc::new(InMemoryOrderRepository::default());

        for method in ["GET", "PUT", "DELETE", "PATCH"] {
            let response = app(repo.clone()).oneshot(request(method, WIDGET)).await.unwrap();
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{}", method);
            assert!(body_text(response).await.is_empty());
        }

        assert!(repo.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_field_is_500() {
        let repo = Arc::new(InMemoryOrderRepository::default());
        let response = app(repo.clone())
            .oneshot(request("POST", r#"{"user_id":"u1"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert!(body.starts_with(ERROR_PREFIX), "{}", body);
        assert!(body.contains("missing field"));
        assert!(repo.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_500() {
        let repo = Arc::new(InMemoryOrderRepository::default());

        for body in ["", "{", "null", r#"{"user_id":"u1","product_id":"p1","name":"Widget","quantity":"three","price":1,"total_amount":1}"#] {
            let response = app(repo.clone()).oneshot(request("POST", body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", body);
            assert!(body_text(response).await.starts_with(ERROR_PREFIX));
        }

        assert!(repo.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_500() {
        let response = app(Arc::new(FailingOrderRepository))
            .oneshot(request("POST", WIDGET))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert!(body.starts_with(ERROR_PREFIX));
        assert!(body.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_concurrent_orders_get_distinct_ids() {
        let repo = Arc::new(InMemoryOrderRepository::default());
        let router = app(repo.clone());

        let (a, b) = tokio::join!(
            router.clone().oneshot(request("POST", WIDGET)),
            router.clone().oneshot(request("POST", WIDGET)),
        );
        assert_eq!(a.unwrap().status(), StatusCode::OK);
        assert_eq!(b.unwrap().status(), StatusCode::OK);

        let rows = repo.rows.lock().unwrap();
        assert_eq!(rows.len(), 2);
        assert_ne!(rows[0].0, rows[1].0);
    }
}
