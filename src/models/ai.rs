//! # AI 프록시 요청/응답 모델
//!
//! 프론트엔드(또는 `client` 모듈)가 AI 엔드포인트에 보내는 본문입니다.
//! 기본값은 원래 서버 동작과 같습니다: `isImage = false`, `mimeType = "image/jpeg"`.

use serde::{Deserialize, Serialize};

fn default_mime_type() -> String {
    "image/jpeg".to_string()
}

/// `POST /api/aiRename`, `POST /api/aiPreview` 요청 본문
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiFileRequest {
    /// 텍스트 본문 또는 base64 이미지
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub is_image: bool,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    #[serde(default)]
    pub file_name: Option<String>,
}

/// `POST /api/ai`, `POST /api/describe-image` 요청 본문
///
/// `task`는 "요약해줘", "키워드 5개" 같은 자유 형식 지시문입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiTaskRequest {
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub is_image: bool,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
}

/// `POST /api/chatbot` 요청 본문
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub input: String,
}

/// 모든 AI 엔드포인트의 공통 응답: `{ "result": "..." }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResult {
    pub result: String,
}
