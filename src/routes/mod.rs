//! # 라우트 핸들러 모듈
//!
//! 모든 API는 `/api` 아래에 있습니다. 인증, 헬스체크, 테마를 제외한 모든
//! 엔드포인트는 Bearer 액세스 토큰이 필요합니다 (`AuthUser` 추출기).
//!
//! 각 하위 모듈:
//! - `auth`: 회원가입, 로그인, 토큰 갱신, 로그아웃, 내 정보
//! - `files`: 파일 CRUD와 조회
//! - `folders`: 폴더 CRUD와 조회
//! - `ai`: 이름 추천, 미리보기, 분석, 이미지 설명, 챗봇
//! - `theme`: 다크 모드 설정 (토큰 선택)
//! - `health`: 서버 상태 확인

pub mod ai;
pub mod auth;
pub mod files;
pub mod folders;
pub mod health;
pub mod theme;

use crate::services::ai::AiProvider;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// 애플리케이션 공유 상태
///
/// 모든 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// AI 구현은 트레이트 객체라 테스트에서 스텁으로 바꿀 수 있습니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    /// JWT 토큰 서명용 비밀키
    pub jwt_secret: String,
    pub ai: Arc<dyn AiProvider>,
}

/// `/api` 아래의 전체 라우터를 만듭니다. 미들웨어 레이어는 `main`에서 씌웁니다.
pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me));

    let ai_routes = Router::new()
        .route("/aiRename", post(ai::ai_rename))
        .route("/aiPreview", post(ai::ai_preview))
        .route("/ai", post(ai::ai_analyse))
        .route("/describe-image", post(ai::describe_image))
        .route("/chatbot", post(ai::chatbot));

    let api_routes = Router::new()
        .merge(auth_routes)
        .merge(ai_routes)
        .route(
            "/files",
            get(files::list_files_by_path).post(files::create_file),
        )
        .route("/files/user", get(files::list_user_files))
        .route(
            "/files/{id}",
            get(files::get_item)
                .put(files::update_file)
                .delete(files::delete_file),
        )
        .route(
            "/folders",
            get(folders::list_folders_by_parent).post(folders::create_folder),
        )
        .route("/folders/user", get(folders::list_user_folders))
        .route(
            "/folders/{id}",
            get(folders::get_folder)
                .put(folders::update_folder)
                .delete(folders::delete_folder),
        )
        .route("/folders/{id}/files", get(files::list_folder_files))
        .route("/user/theme", get(theme::get_theme).put(theme::put_theme))
        .route("/health", get(health::health_check))
        .with_state(state);

    Router::new().nest("/api", api_routes)
}

/// 경로/쿼리로 받은 폴더 ID. 빈 값, `null`, `root`는 루트(`None`)입니다.
pub(crate) fn folder_id_param(raw: &str) -> Option<&str> {
    match raw.trim() {
        "" | "null" | "root" => None,
        id => Some(id),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::services::ai::{AiError, Prompt};
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// 받은 프롬프트를 기록하고 고정 응답을 돌려주는 AI 스텁
    #[derive(Default)]
    pub struct StubAi {
        pub reply: Option<String>,
        pub prompts: Mutex<Vec<Prompt>>,
    }

    #[async_trait]
    impl AiProvider for StubAi {
        async fn complete(&self, prompt: Prompt) -> Result<String, AiError> {
            self.prompts.lock().unwrap().push(prompt);
            self.reply.clone().ok_or(AiError::EmptyResponse)
        }
    }

    pub struct TestApp {
        pub router: Router,
        pub ai: Arc<StubAi>,
    }

    impl TestApp {
        pub async fn new(ai_reply: Option<&str>) -> Self {
            let pool = crate::db::testing::memory_pool().await;
            let ai = Arc::new(StubAi {
                reply: ai_reply.map(str::to_string),
                ..Default::default()
            });
            let state = AppState {
                pool,
                jwt_secret: "test-secret".to_string(),
                ai: ai.clone(),
            };
            Self {
                router: router(state),
                ai,
            }
        }

        pub async fn send(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };
            (status, value)
        }

        /// 새 사용자를 등록하고 액세스 토큰을 돌려줍니다.
        pub async fn register(&self, email: &str) -> String {
            let (status, body) = self
                .send(
                    Method::POST,
                    "/api/auth/register",
                    None,
                    Some(json!({ "email": email, "password": "correct horse" })),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "register failed: {body}");
            body["accessToken"].as_str().unwrap().to_string()
        }
    }
}
