//! # 서비스 계층
//!
//! DB나 HTTP에 묶이지 않는 도메인 로직입니다. 서버와 클라이언트가 함께 씁니다.
//! - `tree`: 폴더 ID 경로 → 폴더 이름 경로 재구성
//! - `search`: `#tag` / `type:ext` 검색 필터와 강조 표시
//! - `naming`: 파일 이름 정리와 업로드 경로 생성
//! - `ai`: 생성형 AI 프록시 (`AiProvider` 트레이트)

pub mod ai;
pub mod naming;
pub mod search;
pub mod tree;

pub use ai::{AiError, AiProvider, OpenAiProvider, Prompt};
pub use naming::*;
pub use search::{Fragment, SearchQuery, Searchable};
pub use tree::reconstruct_file_paths;
