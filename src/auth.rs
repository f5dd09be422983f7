use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    error::AppError,
    models::User,
    repository::{Repository, RepositoryState},
};

/// Lifetime of every issued token. Expiry is absolute, never extended.
pub const TOKEN_TTL: Duration = Duration::hours(1);

/// Claims
///
/// The signed payload carried by every bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Identity the token was issued to.
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub authorized: bool,
    /// Expiration Time: unix seconds after which the token is rejected.
    pub exp: i64,
}

// Decoding shape. The identity claim is kept loose so that an absent or non-numeric value is
// reported as such instead of as a generic parse failure.
#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(rename = "userId", default)]
    user_id: Option<serde_json::Value>,
    exp: i64,
}

/// TokenError
///
/// Why a presented token was refused. Every variant surfaces to the client as a 401.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is expired")]
    Expired,
    #[error("Token signature is invalid")]
    InvalidSignature,
    #[error("Token is malformed")]
    Malformed,
    #[error("Token carries no valid user id")]
    MissingIdentity,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::Unauthenticated(err.to_string())
    }
}

/// TokenService
///
/// Issues and verifies HS256 tokens with the server-held secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenService { .. }")
    }
}

impl TokenService {
    /// new
    ///
    /// Fails with `Fatal` when no signing secret is configured.
    pub fn new(secret: &str) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::Fatal("token signing secret is empty".to_string()));
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// issue
    ///
    /// Signs a token for `user_id` that expires one hour from now.
    pub fn issue(&self, user_id: i64) -> Result<String, AppError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Signs a token as if it had been issued at `issued_at`.
    pub fn issue_at(&self, user_id: i64, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            user_id,
            authorized: true,
            exp: (issued_at + TOKEN_TTL).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Fatal(format!("token signing failed: {e}")))
    }

    /// verify
    ///
    /// Returns the identity id of a token whose signature checks out and whose expiry is still
    /// in the future.
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        let data = decode::<RawClaims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            }
        })?;

        // The library accepts exp == now; a token is only valid strictly before its expiry.
        if data.claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        data.claims
            .user_id
            .as_ref()
            .and_then(identity_from_claim)
            .ok_or(TokenError::MissingIdentity)
    }
}

// Accepts integral JSON numbers, including ones encoded as floats (`7.0`).
fn identity_from_claim(value: &serde_json::Value) -> Option<i64> {
    if let Some(id) = value.as_i64() {
        return Some(id);
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
        .map(|f| f as i64)
}

/// bearer_token
///
/// Pulls the token out of `Authorization: Bearer <token>`. Anything else, including a header
/// that does not split into exactly two space-separated parts, counts as no token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        ["Bearer", token] if !token.is_empty() => Some(*token),
        _ => None,
    }
}

/// authenticate
///
/// Resolves the identity id a request claims. The id is not checked against the user table
/// here; `resolve_caller` does that.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<i64, AppError> {
    let token =
        bearer_token(headers).ok_or_else(|| AppError::Unauthenticated("No token provided".into()))?;
    Ok(tokens.verify(token)?)
}

/// resolve_caller
///
/// Loads the live user behind an authenticated id. Fails with `UnknownIdentity` when the id is
/// not positive or the account is gone.
pub async fn resolve_caller(repo: &dyn Repository, user_id: i64) -> Result<User, AppError> {
    if user_id <= 0 {
        return Err(AppError::UnknownIdentity);
    }
    repo.find_user(user_id)
        .await?
        .ok_or(AppError::UnknownIdentity)
}

/// AuthUser
///
/// The resolved caller of an authenticated request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub user: User,
}

/// AuthUser Extractor Implementation
///
/// Verifies the bearer token, then confirms the identity still exists. Rejects with the
/// matching `AppError`, so a failed gate renders as a normal `{"message"}` 401.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    TokenService: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let tokens = TokenService::from_ref(state);

        let user_id = authenticate(&parts.headers, &tokens).inspect_err(|e| {
            tracing::debug!("authentication rejected: {}", e);
        })?;
        let user = resolve_caller(repo.as_ref(), user_id).await?;

        Ok(AuthUser { id: user.id, user })
    }
}
