//! # 데이터 모델 모듈
//!
//! 서버와 클라이언트가 함께 쓰는 데이터 구조체들입니다.
//! - `folder`: 폴더와 루트 센티널
//! - `file`: 파일 메타데이터와 파생 속성 (MIME, 디코딩)
//! - `user`: 사용자, 인증 토큰, 테마 설정
//! - `ai`: AI 프록시 요청/응답

pub mod ai;
pub mod file;
pub mod folder;
pub mod user;

pub use ai::*;
pub use file::*;
pub use folder::*;
pub use user::*;
