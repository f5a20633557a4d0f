//! # 파일 쿼리
//!
//! 파일 이름은 저장 전에 한 번 더 정리(`sanitize_file_name`)합니다.
//! 정리는 멱등이므로 클라이언트가 이미 정리한 이름은 그대로 남습니다.

use crate::{
    error::AppError,
    models::{CreateFileRequest, FileRecord},
    services::naming::sanitize_file_name,
};
use sqlx::SqlitePool;

const FILE_COLUMNS: &str =
    "id, name, content, preview, path, folder_id, tags, created_at, updated_at";

pub async fn create_file(
    pool: &SqlitePool,
    user_id: &str,
    req: &CreateFileRequest,
) -> Result<FileRecord, AppError> {
    let id = uuid::Uuid::now_v7().to_string();
    let name = sanitize_file_name(req.name.trim());

    sqlx::query(
        r#"
        INSERT INTO files (id, user_id, folder_id, name, content, preview, path, tags)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(&req.folder_id)
    .bind(&name)
    .bind(req.content.as_deref().unwrap_or_default())
    .bind(req.preview.as_deref().unwrap_or(""))
    .bind(&req.path)
    .bind(&req.tags)
    .execute(pool)
    .await?;

    find_file(pool, user_id, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created file".to_string()))
}

pub async fn find_file(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
) -> Result<Option<FileRecord>, AppError> {
    let file = sqlx::query_as::<_, FileRecord>(&format!(
        "SELECT {FILE_COLUMNS} FROM files WHERE id = ? AND user_id = ?"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(file)
}

/// 이름, 내용, 미리보기를 교체합니다. `tags`가 `None`이면 기존 태그를 유지합니다.
///
/// 파일이 없으면 `false`.
pub async fn update_file(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
    name: &str,
    content: &str,
    preview: Option<&str>,
    tags: Option<&str>,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE files
        SET name = ?,
            content = ?,
            preview = COALESCE(?, preview),
            tags = COALESCE(?, tags),
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(sanitize_file_name(name.trim()))
    .bind(content)
    .bind(preview)
    .bind(tags)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_file(pool: &SqlitePool, user_id: &str, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM files WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_user_files(pool: &SqlitePool, user_id: &str) -> Result<Vec<FileRecord>, AppError> {
    let files = sqlx::query_as::<_, FileRecord>(&format!(
        "SELECT {FILE_COLUMNS} FROM files WHERE user_id = ? ORDER BY created_at ASC, id ASC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(files)
}

/// `folder_id`가 `None`이면 루트에 있는 파일들입니다.
pub async fn list_files_by_folder(
    pool: &SqlitePool,
    user_id: &str,
    folder_id: Option<&str>,
) -> Result<Vec<FileRecord>, AppError> {
    let files = sqlx::query_as::<_, FileRecord>(&format!(
        "SELECT {FILE_COLUMNS} FROM files \
         WHERE user_id = ? AND folder_id IS ? \
         ORDER BY created_at ASC, id ASC"
    ))
    .bind(user_id)
    .bind(folder_id)
    .fetch_all(pool)
    .await?;

    Ok(files)
}

/// 저장 경로가 정확히 일치하는 파일들
pub async fn list_files_by_path(
    pool: &SqlitePool,
    user_id: &str,
    path: &str,
) -> Result<Vec<FileRecord>, AppError> {
    let files = sqlx::query_as::<_, FileRecord>(&format!(
        "SELECT {FILE_COLUMNS} FROM files \
         WHERE user_id = ? AND path = ? \
         ORDER BY created_at ASC, id ASC"
    ))
    .bind(user_id)
    .bind(path)
    .fetch_all(pool)
    .await?;

    Ok(files)
}
