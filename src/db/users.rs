//! # 사용자와 리프레시 토큰 쿼리
//!
//! 로그인 ID는 이메일이며 대소문자를 구분하지 않습니다. 리프레시 토큰은
//! SHA-256 해시만 저장하고, 한 번 쓰면 삭제됩니다 (`take_refresh_token`).

use crate::{error::AppError, models::user::User};
use sqlx::SqlitePool;

const USER_COLUMNS: &str = "id, email, display_name, password_hash, created_at, updated_at";

pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    display_name: Option<&str>,
    password_hash: &str,
) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (id, email, display_name, password_hash) VALUES (?, ?, ?, ?) \
         RETURNING {USER_COLUMNS}"
    ))
    .bind(uuid::Uuid::now_v7().to_string())
    .bind(email)
    .bind(display_name)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = ? COLLATE NOCASE"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn store_refresh_token(
    pool: &SqlitePool,
    user_id: &str,
    token_hash: &str,
    expires_at: &str,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at) VALUES (?, ?, ?, ?)",
    )
    .bind(uuid::Uuid::now_v7().to_string())
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// 토큰을 삭제하면서 `(user_id, expires_at)`을 돌려줍니다.
///
/// 조회와 삭제가 한 문장이라 같은 토큰으로 두 번 갱신할 수 없습니다.
/// 만료 여부는 호출자가 판단합니다.
pub async fn take_refresh_token(
    pool: &SqlitePool,
    token_hash: &str,
) -> Result<Option<(String, String)>, AppError> {
    let row = sqlx::query_as::<_, (String, String)>(
        "DELETE FROM refresh_tokens WHERE token_hash = ? RETURNING user_id, expires_at",
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// 사용자의 모든 리프레시 토큰을 지우고 지운 개수를 돌려줍니다.
pub async fn revoke_refresh_tokens(pool: &SqlitePool, user_id: &str) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
