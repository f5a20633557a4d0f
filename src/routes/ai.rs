//! # AI 프록시 핸들러
//!
//! 요청 본문을 검증하고 `Prompt`를 만들어 `AppState.ai`에 넘깁니다.
//! 응답은 항상 `{ "result": "..." }`이고, 업스트림 실패는 502입니다.

use crate::{
    error::AppError,
    middleware::auth::AuthUser,
    models::{AiFileRequest, AiResult, AiTaskRequest, ChatRequest},
    routes::AppState,
    services::ai::Prompt,
};
use axum::{extract::State, Json};

async fn complete(state: &AppState, prompt: Prompt) -> Result<Json<AiResult>, AppError> {
    let result = state.ai.complete(prompt).await?;
    Ok(Json(AiResult { result }))
}

fn require_input(input: &str) -> Result<(), AppError> {
    if input.trim().is_empty() {
        return Err(AppError::BadRequest("Missing input.".to_string()));
    }
    Ok(())
}

/// `POST /aiRename`: 5단어 이내의 새 파일 이름 (확장자 유지)
pub async fn ai_rename(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<AiFileRequest>,
) -> Result<Json<AiResult>, AppError> {
    require_input(&req.input)?;
    tracing::debug!(user_id = %auth.user_id, file_name = ?req.file_name, "ai rename");
    complete(&state, Prompt::rename(&req)).await
}

/// `POST /aiPreview`: 25단어 이내 미리보기
pub async fn ai_preview(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<AiFileRequest>,
) -> Result<Json<AiResult>, AppError> {
    require_input(&req.input)?;
    tracing::debug!(user_id = %auth.user_id, is_image = req.is_image, "ai preview");
    complete(&state, Prompt::preview(&req)).await
}

/// `POST /ai`: 요약, 키워드 추출 등 자유 형식 분석
pub async fn ai_analyse(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<AiTaskRequest>,
) -> Result<Json<AiResult>, AppError> {
    if req.task.trim().is_empty() || req.input.trim().is_empty() {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    }
    complete(&state, Prompt::task(&req)).await
}

/// `POST /describe-image`: 이미지 전용. `isImage`가 false면 400.
pub async fn describe_image(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<AiTaskRequest>,
) -> Result<Json<AiResult>, AppError> {
    if req.task.trim().is_empty()
        || req.input.trim().is_empty()
        || req.mime_type.trim().is_empty()
        || !req.is_image
    {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    }
    complete(&state, Prompt::task(&req)).await
}

pub async fn chatbot(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<ChatRequest>,
) -> Result<Json<AiResult>, AppError> {
    require_input(&req.input)?;
    complete(&state, Prompt::chat(&req.input)).await
}
