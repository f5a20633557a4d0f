//! # 서버 에러 처리 모듈
//!
//! 핸들러가 반환하는 모든 에러를 `AppError` 하나로 모읍니다.
//! `IntoResponse` 구현이 각 variant를 상태 코드와 아래 형태의 JSON 본문으로 바꿉니다.
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Resource not found" } }
//! ```
//!
//! 내부 에러(Database, Internal, Ai)는 실제 원인을 로그에만 남기고
//! 클라이언트에는 일반 메시지만 돌려줍니다.

use crate::services::ai::AiError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// HTTP 404
    #[error("Resource not found")]
    NotFound,

    /// HTTP 400. 필수 필드 누락, 잘못된 값 등
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// HTTP 500
    #[error("Internal error: {0}")]
    Internal(String),

    /// HTTP 500. `?`로 sqlx 에러를 바로 전파할 수 있습니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP 401
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// HTTP 409
    #[error("Conflict: {0}")]
    Conflict(String),

    /// HTTP 502. 업스트림 AI API 실패
    #[error("AI error: {0}")]
    Ai(#[from] AiError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Unauthorized(ref msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone())
            }
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::Ai(ref e) => {
                tracing::error!("AI provider error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "ai_error",
                    "The AI service failed to process the request".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
