//! # 파일 찾기 어시스턴트
//!
//! 질문에 `find` / `locate` / `get` 중 하나가 단어로 들어 있으면 사용자의 파일
//! 목록(`{name, path}` JSON 배열)을 프롬프트에 넣고, 일치하는 경로만 한 줄에
//! 하나씩 답하도록 지시합니다. 그 외 질문은 그대로 챗봇에 보냅니다.
//!
//! 대화 기록은 추가만 됩니다: 사용자 메시지는 호출 전에, 답변(또는 고정 사과 문구)은
//! 호출이 끝난 뒤에 붙습니다.

use super::ApiClient;
use crate::models::FileRecord;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

pub const LOOKUP_VERBS: [&str; 3] = ["find", "locate", "get"];

/// 챗봇 호출이 실패했을 때의 답변
pub const FALLBACK_REPLY: &str = "Something went wrong.";

static LOOKUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\b", LOOKUP_VERBS.join("|"))).expect("static lookup pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

#[derive(Serialize)]
struct FileEntry<'a> {
    name: &'a str,
    path: &'a str,
}

pub fn is_lookup(query: &str) -> bool {
    LOOKUP_RE.is_match(query)
}

/// 챗봇에 보낼 프롬프트를 만듭니다.
///
/// `files`의 `path`는 `reconstruct_file_paths`로 바꾼 읽기 쉬운 경로여야 합니다.
pub fn build_prompt(query: &str, files: &[FileRecord]) -> String {
    if !is_lookup(query) {
        return query.to_string();
    }

    let entries: Vec<FileEntry> = files
        .iter()
        .map(|f| FileEntry {
            name: &f.name,
            path: &f.path,
        })
        .collect();
    let listing = serde_json::to_string(&entries).unwrap_or_else(|_| "[]".to_string());

    format!(
        "{query}\n\n\
         Here are the user's files as a JSON array of {{name, path}} objects:\n\
         {listing}\n\n\
         Return only the path(s) of the matching file(s), one per line, with no other commentary."
    )
}

#[derive(Debug, Default)]
pub struct Assistant {
    messages: Vec<ChatMessage>,
}

impl Assistant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// 질문을 보내고 답변을 기록합니다. 빈 질문은 무시하고 `None`을 돌려줍니다.
    pub async fn ask(&mut self, client: &ApiClient, query: &str, files: &[FileRecord]) -> Option<&ChatMessage> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        self.messages.push(ChatMessage {
            sender: Sender::User,
            text: query.to_string(),
        });

        let reply = match client.chatbot(&build_prompt(query, files)).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Assistant request failed: {}", e);
                FALLBACK_REPLY.to_string()
            }
        };

        self.messages.push(ChatMessage {
            sender: Sender::Assistant,
            text: reply,
        });
        self.messages.last()
    }
}
