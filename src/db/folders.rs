//! # 폴더 쿼리
//!
//! `path` 컬럼은 조상 `[{id, name}]` JSON 배열입니다. 서버가 부모 레코드에서
//! 직접 계산하므로 클라이언트가 보낸 값은 저장하지 않습니다.
//!
//! 폴더 삭제는 스키마의 `ON DELETE CASCADE`로 하위 폴더와 파일까지 지웁니다.

use crate::{
    error::AppError,
    models::{Folder, FolderRef},
};
use sqlx::{types::Json, SqlitePool};

const FOLDER_COLUMNS: &str = "id, name, parent_id, path, tags, created_at";

/// 새 폴더를 만듭니다. `parent`가 `None`이면 루트 아래에 둡니다.
pub async fn create_folder(
    pool: &SqlitePool,
    user_id: &str,
    name: &str,
    parent: Option<&Folder>,
    tags: Option<&str>,
) -> Result<Folder, AppError> {
    let id = uuid::Uuid::now_v7().to_string();
    let (parent_id, path) = match parent {
        Some(parent) => (parent.id.clone(), parent.child_path()),
        None => (None, Vec::new()),
    };

    sqlx::query(
        r#"
        INSERT INTO folders (id, user_id, parent_id, name, path, tags)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(&parent_id)
    .bind(name)
    .bind(Json(&path))
    .bind(tags)
    .execute(pool)
    .await?;

    find_folder(pool, user_id, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created folder".to_string()))
}

pub async fn find_folder(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
) -> Result<Option<Folder>, AppError> {
    let folder = sqlx::query_as::<_, Folder>(&format!(
        "SELECT {FOLDER_COLUMNS} FROM folders WHERE id = ? AND user_id = ?"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(folder)
}

/// `parent_id`가 `None`이면 루트 바로 아래 폴더들입니다.
pub async fn list_folders_by_parent(
    pool: &SqlitePool,
    user_id: &str,
    parent_id: Option<&str>,
) -> Result<Vec<Folder>, AppError> {
    // `IS ?`는 NULL 바인딩에도 일치합니다.
    let folders = sqlx::query_as::<_, Folder>(&format!(
        "SELECT {FOLDER_COLUMNS} FROM folders \
         WHERE user_id = ? AND parent_id IS ? \
         ORDER BY created_at ASC, id ASC"
    ))
    .bind(user_id)
    .bind(parent_id)
    .fetch_all(pool)
    .await?;

    Ok(folders)
}

pub async fn list_user_folders(pool: &SqlitePool, user_id: &str) -> Result<Vec<Folder>, AppError> {
    let folders = sqlx::query_as::<_, Folder>(&format!(
        "SELECT {FOLDER_COLUMNS} FROM folders WHERE user_id = ? ORDER BY created_at ASC, id ASC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(folders)
}

/// 폴더 이름을 바꾸고, 이 폴더를 조상으로 가진 모든 폴더의 `path` 항목도 같은
/// 트랜잭션 안에서 새 이름으로 고칩니다.
///
/// 폴더가 없으면 `false`.
pub async fn rename_folder(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
    new_name: &str,
) -> Result<bool, AppError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "UPDATE folders SET name = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
         WHERE id = ? AND user_id = ?",
    )
    .bind(new_name)
    .bind(id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    let descendants = sqlx::query_as::<_, (String, Json<Vec<FolderRef>>)>(
        r#"
        SELECT id, path FROM folders
        WHERE user_id = ?
          AND EXISTS (
            SELECT 1 FROM json_each(folders.path)
            WHERE json_extract(json_each.value, '$.id') = ?
          )
        "#,
    )
    .bind(user_id)
    .bind(id)
    .fetch_all(&mut *tx)
    .await?;

    for (descendant_id, Json(mut path)) in descendants {
        for entry in path.iter_mut().filter(|entry| entry.id == id) {
            entry.name = new_name.to_string();
        }
        sqlx::query("UPDATE folders SET path = ? WHERE id = ?")
            .bind(Json(&path))
            .bind(&descendant_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(true)
}

/// 폴더와 그 하위 폴더, 포함된 파일을 모두 삭제합니다. 폴더가 없으면 `false`.
pub async fn delete_folder(pool: &SqlitePool, user_id: &str, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM folders WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
