//! # 애플리케이션 설정(Configuration) 모듈
//!
//! `.env` 파일이나 시스템 환경변수에서 서버 설정값을 읽어옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: JWT 토큰 서명 비밀키 (필수)
//! - `HOST` / `PORT`: 바인딩 주소 (기본값 `0.0.0.0:5000`)
//! - `FRONTEND_URL`: 추가로 허용할 CORS origin
//! - `FRONTEND_DIST`: 빌드된 프론트엔드 디렉토리 (기본값 `../frontend/dist`)
//! - `MAX_BODY_BYTES`: 요청 본문 최대 크기 (기본값 50MB, base64 업로드용)
//! - `AI_API_KEY`, `AI_API_BASE`, `AI_MODEL`: 생성형 AI API 설정

use std::env;

/// 개발용 프론트엔드 origin. `FRONTEND_URL`과 함께 항상 허용됩니다.
pub const DEV_FRONTEND_ORIGIN: &str = "http://localhost:3000";

/// 애플리케이션 전체 설정
///
/// 서버 시작 시 한 번 읽어 `main`에서 필요한 곳에 나눠줍니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// 예: `"sqlite:data/filenest.db"`
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: Option<String>,
    pub frontend_dist: String,
    pub max_body_bytes: usize,
    /// 없으면 AI 엔드포인트는 502를 돌려줍니다 (나머지 API는 정상 동작).
    pub ai_api_key: Option<String>,
    pub ai_api_base: String,
    pub ai_model: String,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 `Config`를 만듭니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`이 없으면 `VarError`를 반환합니다.
    /// 나머지는 기본값이 있고, 숫자 파싱에 실패해도 기본값을 씁니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            frontend_url: env::var("FRONTEND_URL").ok().filter(|v| !v.is_empty()),
            frontend_dist: env::var("FRONTEND_DIST")
                .unwrap_or_else(|_| "../frontend/dist".to_string()),
            max_body_bytes: env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50 * 1024 * 1024),
            ai_api_key: env::var("AI_API_KEY").ok().filter(|v| !v.is_empty()),
            ai_api_base: env::var("AI_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            ai_model: env::var("AI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
        })
    }

    /// CORS에서 허용할 origin 목록 (중복 제거)
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![DEV_FRONTEND_ORIGIN.to_string()];
        if let Some(url) = &self.frontend_url {
            let url = url.trim_end_matches('/').to_string();
            if !origins.contains(&url) {
                origins.push(url);
            }
        }
        origins
    }
}
