use crate::error::AppError;
use sqlx::SqlitePool;

/// 토큰 없이 요청한 클라이언트들이 함께 쓰는 설정 키
pub const ANONYMOUS_OWNER: &str = "anonymous";

/// 저장된 값이 없으면 `false`
pub async fn get_dark_mode(pool: &SqlitePool, owner: &str) -> Result<bool, AppError> {
    let row = sqlx::query_as::<_, (bool,)>("SELECT dark_mode FROM themes WHERE owner = ?")
        .bind(owner)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(dark_mode,)| dark_mode).unwrap_or(false))
}

pub async fn set_dark_mode(pool: &SqlitePool, owner: &str, dark_mode: bool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO themes (owner, dark_mode) VALUES (?, ?)
        ON CONFLICT(owner) DO UPDATE
        SET dark_mode = excluded.dark_mode,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        "#,
    )
    .bind(owner)
    .bind(dark_mode)
    .execute(pool)
    .await?;

    Ok(())
}
