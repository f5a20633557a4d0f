use crate::{
    db::users as db_users,
    error::AppError,
    middleware::auth::{
        create_access_token, create_refresh_token, hash_token, verify_token, AuthUser, TokenKind,
        REFRESH_TOKEN_DAYS,
    },
    models::user::*,
    routes::AppState,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

const EXPIRES_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// 액세스/리프레시 토큰 쌍을 발급하고 리프레시 토큰 해시를 저장합니다.
async fn issue_tokens(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let access_token = create_access_token(&user.id, &state.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;
    let refresh_token = create_refresh_token(&user.id, &state.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    let expires_at = (Utc::now() + Duration::days(REFRESH_TOKEN_DAYS))
        .format(EXPIRES_AT_FORMAT)
        .to_string();
    db_users::store_refresh_token(&state.pool, &user.id, &hash_token(&refresh_token), &expires_at)
        .await?;

    Ok(AuthResponse {
        user: user.into(),
        access_token,
        refresh_token,
    })
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = req.email.trim();
    if !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::BadRequest("Password must be at least 8 characters".to_string()));
    }

    if db_users::find_by_email(&state.pool, email).await?.is_some() {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    // Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
        .to_string();

    let display_name = req
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());
    let user = db_users::create_user(&state.pool, email, display_name, &password_hash).await?;

    tracing::info!(user_id = %user.id, "registered user");
    Ok(Json(issue_tokens(&state, user).await?))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = db_users::find_by_email(&state.pool, req.email.trim())
        .await?
        .ok_or(AppError::Unauthorized("Invalid email or password".to_string()))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password hash parse error: {}", e)))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized("Invalid email or password".to_string()))?;

    Ok(Json(issue_tokens(&state, user).await?))
}

/// 리프레시 토큰은 한 번만 쓸 수 있습니다. 사용하면 삭제하고 새 쌍을 발급합니다.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    verify_token(&req.refresh_token, &state.jwt_secret, TokenKind::Refresh)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token".to_string()))?;

    let (user_id, expires_at) =
        db_users::take_refresh_token(&state.pool, &hash_token(&req.refresh_token))
            .await?
            .ok_or(AppError::Unauthorized("Refresh token not found or revoked".to_string()))?;

    let expires = chrono::NaiveDateTime::parse_from_str(&expires_at, EXPIRES_AT_FORMAT)
        .map_err(|e| AppError::Internal(format!("Date parse error: {}", e)))?;
    if expires.and_utc() < Utc::now() {
        return Err(AppError::Unauthorized("Refresh token expired".to_string()));
    }

    let user = db_users::find_by_id(&state.pool, &user_id)
        .await?
        .ok_or(AppError::Unauthorized("User not found".to_string()))?;

    Ok(Json(issue_tokens(&state, user).await?))
}

pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let revoked = db_users::revoke_refresh_tokens(&state.pool, &auth_user.user_id).await?;
    tracing::debug!(user_id = %auth_user.user_id, revoked, "logged out");

    Ok(Json(json!({ "message": "Logged out successfully" })))
}

pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(user.into()))
}
