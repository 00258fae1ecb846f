use anyhow::Context;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::backend::error::ApiError;
use crate::backend::AppState;
use crate::database::db::queries;
use crate::database::models::User;

/*
Passwords and bearer tokens. Argon2id for storage, HS256 JWTs for the
access/refresh pair. Access tokens are the only thing the protected
routes accept; refresh tokens are only good for minting a new access
token.
 */

const ACCESS_TOKEN: &str = "access";
const REFRESH_TOKEN: &str = "refresh";

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .context("failed to hash password")?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub token_type: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly minted access/refresh pair with the expiry instants the
/// login response reports.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TokenConfig {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: &str, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::seconds(access_ttl_secs),
            refresh_ttl: Duration::seconds(refresh_ttl_secs),
        }
    }

    fn issue(
        &self,
        user_id: i64,
        token_type: &str,
        ttl: Duration,
    ) -> anyhow::Result<(String, DateTime<Utc>)> {
        let now = Utc::now();
        let expires_at = now + ttl;
        let claims = Claims {
            user_id,
            token_type: token_type.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .context("failed to sign token")?;
        Ok((token, expires_at))
    }

    pub fn issue_access(&self, user_id: i64) -> anyhow::Result<(String, DateTime<Utc>)> {
        self.issue(user_id, ACCESS_TOKEN, self.access_ttl)
    }

    pub fn issue_pair(&self, user_id: i64) -> anyhow::Result<TokenPair> {
        let (access, access_expires_at) = self.issue(user_id, ACCESS_TOKEN, self.access_ttl)?;
        let (refresh, refresh_expires_at) = self.issue(user_id, REFRESH_TOKEN, self.refresh_ttl)?;
        Ok(TokenPair {
            access,
            refresh,
            access_expires_at,
            refresh_expires_at,
        })
    }

    fn verify(&self, token: &str, expected_type: &str) -> Option<Claims> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default()).ok()?;
        if data.claims.token_type != expected_type {
            return None;
        }
        Some(data.claims)
    }

    pub fn verify_access(&self, token: &str) -> Option<Claims> {
        self.verify(token, ACCESS_TOKEN)
    }

    pub fn verify_refresh(&self, token: &str) -> Option<Claims> {
        self.verify(token, REFRESH_TOKEN)
    }
}

/// Extractor behind every protected route: reads the bearer header,
/// checks the access token and loads the owning user row. Ownership
/// filters downstream all key off this user's id.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized(
                "Authentication credentials were not provided.",
            ))?;

        let claims = state
            .tokens
            .verify_access(token)
            .ok_or(ApiError::Unauthorized("Token is invalid or expired"))?;

        // The token can outlive its account.
        let user = queries::find_user_by_id(&state.db, claims.user_id)
            .await?
            .ok_or(ApiError::Unauthorized("User not found"))?;

        Ok(CurrentUser(user))
    }
}
