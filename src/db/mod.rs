//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 라우트 핸들러(routes/)는 SQL을 직접 쓰지 않고 이 모듈의 함수를 호출합니다.
//! 모든 조회/수정 함수는 `user_id`를 받아 호출자 소유의 행만 다룹니다.
//!
//! 각 하위 모듈:
//! - `folders`: 폴더 CRUD, 이름 변경 시 하위 폴더 path 갱신
//! - `files`: 파일 CRUD와 폴더/경로별 조회
//! - `themes`: 다크 모드 설정
//! - `users`: 사용자와 리프레시 토큰

pub mod files;
pub mod folders;
pub mod themes;
pub mod users;

pub use files::*;
pub use folders::*;
pub use themes::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// 연결 풀을 만들고 마이그레이션을 실행합니다.
///
/// DB 파일이 없으면 새로 만듭니다. 외래키 제약(연쇄 삭제)은 sqlx 기본값으로 켜져 있습니다.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
