//! # 다크 모드 설정 핸들러
//!
//! - `GET /api/user/theme` → `{ darkMode }` (저장된 값이 없으면 `false`)
//! - `PUT /api/user/theme` ← `{ darkMode: bool }`
//!
//! 토큰이 있으면 사용자별로, 없으면 익명 공용 키로 저장합니다.

use crate::{
    db::{self, ANONYMOUS_OWNER},
    error::AppError,
    middleware::auth::MaybeAuthUser,
    models::ThemeResponse,
    routes::AppState,
};
use axum::{extract::State, Json};
use serde_json::Value;

fn owner(auth: &MaybeAuthUser) -> &str {
    auth.0
        .as_ref()
        .map(|user| user.user_id.as_str())
        .unwrap_or(ANONYMOUS_OWNER)
}

pub async fn get_theme(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
) -> Result<Json<ThemeResponse>, AppError> {
    let dark_mode = db::get_dark_mode(&state.pool, owner(&auth)).await?;
    Ok(Json(ThemeResponse { dark_mode }))
}

/// `darkMode`가 불리언이 아니면 400입니다 (`"true"` 문자열도 거부).
pub async fn put_theme(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
    Json(body): Json<Value>,
) -> Result<Json<ThemeResponse>, AppError> {
    let dark_mode = body
        .get("darkMode")
        .and_then(Value::as_bool)
        .ok_or(AppError::BadRequest("darkMode must be a boolean".to_string()))?;

    db::set_dark_mode(&state.pool, owner(&auth), dark_mode).await?;
    Ok(Json(ThemeResponse { dark_mode }))
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::TestApp;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn defaults_to_light_and_persists_per_user() {
        let app = TestApp::new(None).await;
        let alice = app.register("a@example.com").await;
        let bob = app.register("b@example.com").await;

        let (status, body) = app.send(Method::GET, "/api/user/theme", Some(&alice), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["darkMode"], false);

        let (status, _) = app
            .send(
                Method::PUT,
                "/api/user/theme",
                Some(&alice),
                Some(json!({ "darkMode": true })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = app.send(Method::GET, "/api/user/theme", Some(&alice), None).await;
        assert_eq!(body["darkMode"], true);
        let (_, body) = app.send(Method::GET, "/api/user/theme", Some(&bob), None).await;
        assert_eq!(body["darkMode"], false);
    }

    #[tokio::test]
    async fn anonymous_preference_is_shared() {
        let app = TestApp::new(None).await;
        app.send(Method::PUT, "/api/user/theme", None, Some(json!({ "darkMode": true })))
            .await;
        let (status, body) = app.send(Method::GET, "/api/user/theme", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["darkMode"], true);
    }

    #[tokio::test]
    async fn rejects_non_boolean_and_bad_tokens() {
        let app = TestApp::new(None).await;
        let (status, body) = app
            .send(Method::PUT, "/api/user/theme", None, Some(json!({ "darkMode": "true" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "darkMode must be a boolean");

        let (status, _) = app
            .send(Method::GET, "/api/user/theme", Some("not-a-jwt"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
