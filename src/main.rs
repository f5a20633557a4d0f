//! # filenest 웹 서버 진입점
//!
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 연결 풀 생성과 마이그레이션
//! 4. AI 프로바이더와 API 라우터 설정
//! 5. CORS, 본문 크기 제한, 보안 헤더, 정적 파일 서빙
//! 6. HTTP 서버 시작

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
};
use filenest::{config::Config, db, routes, services::OpenAiProvider};
use std::{path::Path, sync::Arc};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "filenest=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting filenest server on {}:{}", config.host, config.port);

    // 연결 생성과 함께 마이그레이션까지 실행됩니다
    let pool = db::init_pool(&config.database_url, 5).await?;

    let ai = OpenAiProvider::new(&config.ai_api_base, config.ai_api_key.clone(), &config.ai_model);
    if !ai.is_configured() {
        tracing::warn!("AI_API_KEY not set, AI endpoints will return 502");
    }

    let state = routes::AppState {
        pool,
        jwt_secret: config.jwt_secret.clone(),
        ai: Arc::new(ai),
    };

    let origins: Vec<HeaderValue> = config
        .allowed_origins()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let api = routes::router(state);

    // 빌드된 프론트엔드가 있으면 같은 서버에서 서빙 (SPA라 없는 경로는 index.html)
    let frontend_dist = Path::new(&config.frontend_dist);
    let app = if frontend_dist.exists() {
        tracing::info!("Serving frontend static files from {}", config.frontend_dist);
        let serve_dir = ServeDir::new(frontend_dist)
            .not_found_service(ServeFile::new(frontend_dist.join("index.html")));
        api.fallback_service(serve_dir)
    } else {
        tracing::warn!("Frontend dist directory not found, serving API only");
        api
    };

    let app = app
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
