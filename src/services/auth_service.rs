//! Domain service for authentication.
//!
//! Exchanges the configured credential pair for a signed, time limited
//! bearer token and validates tokens presented on protected routes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Self::TokenExpired,
            _ => Self::InvalidToken(err.to_string()),
        }
    }
}

/// Claims carried by every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token was issued to.
    pub sub: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token id.
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
}

/// Domain service trait for authentication.
pub trait AuthService: Send + Sync {
    /// Returns a token when both values match the configured pair, `None`
    /// otherwise.
    fn authenticate(&self, username: &str, password: &str)
    -> Result<Option<IssuedToken>, AuthError>;

    /// Verifies signature and expiry and returns the embedded claims.
    fn validate_token(&self, token: &str) -> Result<Claims, AuthError>;
}
