//! # 인증 미들웨어
//!
//! - `AuthUser`: 유효한 Bearer 액세스 토큰이 있어야 하는 핸들러용 추출기
//! - `MaybeAuthUser`: 토큰이 없어도 되는 핸들러용 (테마 설정). 토큰이 있는데
//!   유효하지 않으면 여전히 401입니다.
//!
//! 액세스 토큰은 15분, 리프레시 토큰은 7일 동안 유효합니다. 두 토큰은 `kind`
//! 클레임으로 구분되어 서로의 자리에 쓸 수 없습니다.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::routes::AppState;

pub const ACCESS_TOKEN_MINUTES: i64 = 15;
pub const REFRESH_TOKEN_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
    pub kind: TokenKind,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or(AuthError::MissingToken)?;
        let claims = verify_token(token, &state.jwt_secret, TokenKind::Access)?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

/// 토큰이 선택 사항인 엔드포인트용 추출기
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts)? else {
            return Ok(MaybeAuthUser(None));
        };
        let claims = verify_token(token, &state.jwt_secret, TokenKind::Access)?;

        Ok(MaybeAuthUser(Some(AuthUser {
            user_id: claims.sub,
        })))
    }
}

/// `Authorization` 헤더가 없으면 `Ok(None)`, `Bearer ` 형식이 아니면 `InvalidToken`
fn bearer_token(parts: &Parts) -> Result<Option<&str>, AuthError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|token| Some(token.trim()))
        .ok_or(AuthError::InvalidToken)
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "missing_token",
                "Authorization token is required",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid authorization token",
            ),
            AuthError::ExpiredToken => (
                StatusCode::UNAUTHORIZED,
                "expired_token",
                "Authorization token has expired",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn create_token(
    user_id: &str,
    secret: &str,
    kind: TokenKind,
    lifetime: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + lifetime).timestamp(),
        jti: uuid::Uuid::now_v7().to_string(),
        kind,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn create_access_token(
    user_id: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token(
        user_id,
        secret,
        TokenKind::Access,
        Duration::minutes(ACCESS_TOKEN_MINUTES),
    )
}

pub fn create_refresh_token(
    user_id: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token(
        user_id,
        secret,
        TokenKind::Refresh,
        Duration::days(REFRESH_TOKEN_DAYS),
    )
}

pub fn verify_token(token: &str, secret: &str, expected: TokenKind) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;

    if token_data.claims.kind != expected {
        return Err(AuthError::InvalidToken);
    }

    Ok(token_data.claims)
}

/// 리프레시 토큰은 SHA-256 해시로만 저장합니다.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_round_trip() {
        let token = create_access_token("user-1", "secret").unwrap();
        let claims = verify_token(&token, "secret", TokenKind::Access).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert!(claims.exp - claims.iat == ACCESS_TOKEN_MINUTES * 60);
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let token = create_refresh_token("user-1", "secret").unwrap();
        assert!(matches!(
            verify_token(&token, "secret", TokenKind::Access),
            Err(AuthError::InvalidToken)
        ));
        assert!(verify_token(&token, "secret", TokenKind::Refresh).is_ok());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_access_token("user-1", "secret").unwrap();
        assert!(matches!(
            verify_token(&token, "other", TokenKind::Access),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn tokens_issued_together_differ() {
        let a = create_refresh_token("user-1", "secret").unwrap();
        let b = create_refresh_token("user-1", "secret").unwrap();
        assert_ne!(hash_token(&a), hash_token(&b));
    }
}
