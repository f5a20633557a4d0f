//! # 헬스체크(Health Check) 핸들러
//!
//! - `GET /api/health` → `{ "status": "ok" }`
//!
//! 로드밸런서나 컨테이너 오케스트레이터가 서버 가동 여부를 확인할 때 씁니다.

use axum::Json;
use serde_json::{json, Value};

/// 인증 없이 호출할 수 있고, 실패하지 않습니다.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::TestApp;
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn health_is_public() {
        let app = TestApp::new(None).await;
        let (status, body) = app.send(Method::GET, "/api/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
