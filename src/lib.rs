//! # filenest
//!
//! 클라우드 파일 저장소 백엔드와 그 클라이언트 라이브러리입니다.
//!
//! - `routes`, `db`, `middleware`: axum + SQLite HTTP API
//! - `services`: 폴더 경로 복원, 검색, 이름 정리, AI 프록시
//! - `client`: API 클라이언트, 업로드 흐름, 파일 찾기 어시스턴트

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
