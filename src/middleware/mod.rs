//! # 미들웨어
//!
//! 요청에서 인증 정보를 꺼내는 추출기와 JWT 유틸리티가 있습니다.

pub mod auth;
