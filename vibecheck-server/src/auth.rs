//! Admin credentials and session tokens
//!
//! The admin password is stored as a SHA-256 hex digest and compared in
//! constant time. Logging in mints an opaque random token with a 24-hour
//! expiry, held in a `SessionStore` owned by the application state.
//! Sessions do not survive a restart.

use std::collections::HashMap;
use std::sync::Mutex;

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::ApiError;
use crate::state::AppState;

/// Session lifetime in hours
const SESSION_TTL_HOURS: i64 = 24;

/// SHA-256 hex digest of a password
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash the candidate and compare against the stored digest in constant time
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let candidate = hash_password(password);
    constant_time_eq(candidate.as_bytes(), stored_hash.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn mint_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Issued admin session tokens with their expiry times
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_ttl(Duration::hours(SESSION_TTL_HOURS))
    }

    /// Store with an explicit session lifetime (for tests)
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Mint a token and record its expiry
    pub fn issue(&self) -> String {
        let token = mint_token();
        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        sessions.insert(token.clone(), Utc::now() + self.ttl);
        token
    }

    /// Whether the token is known and unexpired; expired tokens are pruned
    pub fn is_valid(&self, token: &str) -> bool {
        let now = Utc::now();
        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        sessions.retain(|_, expires_at| *expires_at > now);
        sessions.contains_key(token)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Extractor guarding admin-only routes
///
/// Rejects with 401 unless the request carries `Authorization: Bearer <token>`
/// for a currently valid session.
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized("missing authorization header"))?;

        let token = header
            .trim()
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("malformed authorization header"))?;

        if !state.sessions().is_valid(token) {
            return Err(ApiError::Unauthorized("invalid or expired token"));
        }

        Ok(Self)
    }
}
