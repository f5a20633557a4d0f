//! # 파일(File) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST   /api/files`                    → 업로드 `{ message, file }`
//! - `PUT    /api/files/{id}`               → 이름/내용/미리보기 수정 `{ success }`
//! - `DELETE /api/files/{id}`               → 삭제 `{ success }`
//! - `GET    /api/files/user`               → 내 파일 전체 `{ files }`
//! - `GET    /api/files?folderPath=`        → 저장 경로가 일치하는 파일 `{ files }`
//! - `GET    /api/files/{id}?collection=`   → 파일 또는 폴더 하나 `{ item }`
//! - `GET    /api/folders/{id}/files`       → 폴더 안의 파일 (`null` = 루트) `{ files }`

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::{folder_id_param, AppState},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderPathQuery {
    pub folder_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ItemQuery {
    pub collection: Option<String>,
}

pub async fn create_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFileRequest>,
) -> Result<Json<CreateFileResponse>, AppError> {
    if req.name.trim().is_empty() || req.content.is_none() || req.path.trim().is_empty() {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    }

    if let Some(folder_id) = req.folder_id.as_deref() {
        db::find_folder(&state.pool, &auth.user_id, folder_id)
            .await?
            .ok_or(AppError::NotFound)?;
    }

    let file = db::create_file(&state.pool, &auth.user_id, &req).await?;
    tracing::info!(
        file_id = %file.id,
        name = %file.name,
        folder_id = ?file.folder_id,
        "file uploaded"
    );

    Ok(Json(CreateFileResponse {
        message: "File uploaded successfully".to_string(),
        file,
    }))
}

pub async fn update_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateFileRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    // 빈 내용("")은 빈 파일이라 허용합니다
    let Some(content) = req.content.as_deref().filter(|_| !req.name.trim().is_empty()) else {
        return Err(AppError::BadRequest("Missing name or content".to_string()));
    };

    tracing::debug!(file_id = %id, file_path = ?req.file_path, "updating file");
    let updated = db::update_file(
        &state.pool,
        &auth.user_id,
        &id,
        &req.name,
        content,
        req.preview.as_deref(),
        req.tags.as_deref(),
    )
    .await?;
    if !updated {
        return Err(AppError::NotFound);
    }

    Ok(Json(SuccessResponse { success: true }))
}

/// 요청 본문(`filePath`)은 무시합니다. ID만으로 삭제합니다.
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !db::delete_file(&state.pool, &auth.user_id, &id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(file_id = %id, "file deleted");

    Ok(Json(SuccessResponse { success: true }))
}

pub async fn list_user_files(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<FilesResponse>, AppError> {
    let files = db::list_user_files(&state.pool, &auth.user_id).await?;
    Ok(Json(FilesResponse { files }))
}

pub async fn list_files_by_path(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<FolderPathQuery>,
) -> Result<Json<FilesResponse>, AppError> {
    let folder_path = query
        .folder_path
        .filter(|p| !p.trim().is_empty())
        .ok_or(AppError::BadRequest("Missing folderPath".to_string()))?;

    let files = db::list_files_by_path(&state.pool, &auth.user_id, &folder_path).await?;
    Ok(Json(FilesResponse { files }))
}

pub async fn list_folder_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(folder_id): Path<String>,
) -> Result<Json<FilesResponse>, AppError> {
    let files =
        db::list_files_by_folder(&state.pool, &auth.user_id, folder_id_param(&folder_id)).await?;
    Ok(Json(FilesResponse { files }))
}

/// `collection`은 `files`(기본값) 또는 `folders`
pub async fn get_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Query(query): Query<ItemQuery>,
) -> Result<Json<Value>, AppError> {
    let item = match query.collection.as_deref().unwrap_or("files") {
        "files" => db::find_file(&state.pool, &auth.user_id, &id)
            .await?
            .map(|file| json!(file)),
        "folders" => db::find_folder(&state.pool, &auth.user_id, &id)
            .await?
            .map(|folder| json!(folder)),
        other => {
            return Err(AppError::BadRequest(format!("Unknown collection: {}", other)));
        }
    };

    let item = item.ok_or(AppError::NotFound)?;
    Ok(Json(json!({ "item": item })))
}
