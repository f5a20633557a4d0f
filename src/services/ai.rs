//! # 생성형 AI 프록시
//!
//! 파일 이름 추천, 미리보기 요약, 자유 형식 분석, 이미지 설명, 챗봇 응답을
//! OpenAI 호환 `chat/completions` API 한 곳으로 보냅니다.
//!
//! 라우트 핸들러는 구체 구현이 아니라 `AiProvider` 트레이트에만 의존하므로,
//! 테스트에서는 네트워크 없이 스텁 구현을 `AppState`에 넣을 수 있습니다.
//!
//! 이미지는 `data:<mime>;base64,<input>` 형태의 `image_url` 파트로 전달합니다.

use crate::models::{AiFileRequest, AiTaskRequest};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// AI 요청 타임아웃
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const SHORT_MAX_TOKENS: u32 = 50;
const LONG_MAX_TOKENS: u32 = 1024;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI provider is not configured")]
    NotConfigured,

    #[error("AI request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("AI provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("AI provider returned an empty response")]
    EmptyResponse,
}

/// 프롬프트에 첨부하는 base64 이미지
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub mime_type: String,
    pub base64: String,
}

impl ImageInput {
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

/// 모델에 보낼 단일 사용자 메시지
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub image: Option<ImageInput>,
    pub max_tokens: u32,
}

impl Prompt {
    pub fn text(text: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            text: text.into(),
            image: None,
            max_tokens,
        }
    }

    pub fn with_image(mut self, mime_type: &str, base64: &str) -> Self {
        self.image = Some(ImageInput {
            mime_type: mime_type.to_string(),
            base64: base64.to_string(),
        });
        self
    }

    /// 내용 기반 파일 이름 추천 (5단어 이내, 확장자 유지)
    pub fn rename(req: &AiFileRequest) -> Self {
        let original = req.file_name.as_deref().unwrap_or("unknown");
        if req.is_image {
            Self::text(
                format!(
                    "Rename the image based on its content within 5 words, keeping the file extension.\n\
                     Reply with the new file name only.\nOriginal name: {}",
                    original
                ),
                SHORT_MAX_TOKENS,
            )
            .with_image(&req.mime_type, &req.input)
        } else {
            Self::text(
                format!(
                    "Rename the following text based on its content within 5 words, keeping the file extension.\n\
                     Reply with the new file name only.\nOriginal name: {}\nContent:\n{}",
                    original, req.input
                ),
                SHORT_MAX_TOKENS,
            )
        }
    }

    /// 25단어 이내 미리보기 요약
    pub fn preview(req: &AiFileRequest) -> Self {
        if req.is_image {
            Self::text("Describe the image within 25 words.", SHORT_MAX_TOKENS)
                .with_image(&req.mime_type, &req.input)
        } else {
            Self::text(
                format!("Preview this content within 25 words:\n{}", req.input),
                SHORT_MAX_TOKENS,
            )
        }
    }

    /// 자유 형식 지시문 (요약, 키워드, 객체 식별 등)
    pub fn task(req: &AiTaskRequest) -> Self {
        if req.is_image {
            Self::text(req.task.clone(), LONG_MAX_TOKENS).with_image(&req.mime_type, &req.input)
        } else {
            Self::text(format!("{}\n\n{}", req.task, req.input), LONG_MAX_TOKENS)
        }
    }

    pub fn chat(input: &str) -> Self {
        Self::text(input, LONG_MAX_TOKENS)
    }

    /// `messages[0].content` 값. 이미지가 없으면 문자열, 있으면 파트 배열입니다.
    fn content(&self) -> Value {
        match &self.image {
            None => Value::String(self.text.clone()),
            Some(image) => json!([
                { "type": "text", "text": self.text },
                { "type": "image_url", "image_url": { "url": image.data_url() } },
            ]),
        }
    }
}

#[async_trait]
pub trait AiProvider: Send + Sync {
    /// 프롬프트를 보내고 앞뒤 공백을 제거한 응답 텍스트를 돌려줍니다.
    async fn complete(&self, prompt: Prompt) -> Result<String, AiError>;
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI 호환 API 구현
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_base: &str, api_key: Option<String>, model: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn request_body(&self, prompt: &Prompt) -> Value {
        json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt.content() }],
            "max_tokens": prompt.max_tokens,
        })
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    async fn complete(&self, prompt: Prompt) -> Result<String, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::NotConfigured)?;

        tracing::debug!(
            model = %self.model,
            has_image = prompt.image.is_some(),
            max_tokens = prompt.max_tokens,
            "sending chat completion"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(api_key)
            .json(&self.request_body(&prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletion = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(AiError::EmptyResponse)
    }
}
