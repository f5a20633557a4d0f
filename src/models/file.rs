//! # 파일(File) 모델
//!
//! 저장된 파일의 메타데이터와 내용(base64)을 표현합니다.
//! 확장자, MIME 타입, 텍스트/이미지 여부, 디코딩된 본문은 저장하지 않고
//! 이름과 내용으로부터 매번 계산합니다.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

pub const MIME_PNG: &str = "image/png";
pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_TEXT: &str = "text/plain";
pub const MIME_FALLBACK: &str = "application/octet-stream";

/// 파일 이름으로 MIME 타입을 분류합니다.
///
/// png/jpg/jpeg는 이미지, txt는 텍스트, 나머지는 바이너리 기본값입니다.
pub fn mime_type_for(name: &str) -> &'static str {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".png") {
        MIME_PNG
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        MIME_JPEG
    } else if lower.ends_with(".txt") {
        MIME_TEXT
    } else {
        MIME_FALLBACK
    }
}

/// 파일 엔티티: DB의 `files` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// base64 인코딩된 내용
    #[serde(default)]
    pub content: String,
    /// AI가 생성한 짧은 설명
    #[serde(default)]
    pub preview: String,
    /// 저장 경로: 조상 폴더 ID들과 파일 이름을 `/`로 이은 문자열
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl FileRecord {
    /// 마지막 `.`부터의 확장자 (예: ".txt"). 점이 없으면 빈 문자열.
    pub fn extension(&self) -> &str {
        self.name
            .rfind('.')
            .map(|idx| &self.name[idx..])
            .unwrap_or("")
    }

    pub fn mime_type(&self) -> &'static str {
        mime_type_for(&self.name)
    }

    pub fn is_image(&self) -> bool {
        self.mime_type().starts_with("image/")
    }

    pub fn is_text(&self) -> bool {
        self.mime_type() == MIME_TEXT
    }

    /// 텍스트 파일이면 base64를 디코딩한 문자열을, 아니면 원본 내용을 돌려줍니다.
    ///
    /// 디코딩에 실패하면 고정 에러 문구를 돌려줍니다 (화면 표시용).
    pub fn decoded_content(&self) -> String {
        if !self.is_text() {
            return self.content.clone();
        }
        match STANDARD.decode(self.content.as_bytes()) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                tracing::warn!("Decoding error for {}: {}", self.name, e);
                "Error decoding content.".to_string()
            }
        }
    }
}

/// `POST /api/files` 요청 본문
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileRequest {
    #[serde(default)]
    pub name: String,
    /// 빈 파일은 `""`입니다. 키 자체가 없을 때만 `None`.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
}

/// `PUT /api/files/{fileId}` 요청 본문
///
/// `filePath`는 로그용으로만 쓰입니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFileResponse {
    pub message: String,
    pub file: FileRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesResponse {
    pub files: Vec<FileRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}
