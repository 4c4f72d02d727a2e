//! HTTP 错误响应

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use errors::AppError;

/// 失败响应的正文前缀，与成功文本区分
pub const ERROR_PREFIX: &str = "Error: ";

/// 处理订单时的错误
///
/// 方法校验之后的所有失败一律返回 500，正文为 `Error: <描述>`
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("{}{}", ERROR_PREFIX, self.0),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_validation_error_is_500() {
        let response = ApiError(AppError::validation("missing field `quantity`")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(
            body.as_ref(),
            b"Error: Validation error: missing field `quantity`"
        );
    }
}
