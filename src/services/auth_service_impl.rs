//! HS256 JWT implementation of the `AuthService` trait.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::services::auth_service::{AuthError, AuthService, Claims, IssuedToken};

pub struct JwtAuthService {
    username: String,
    password: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime_secs: i64,
}

impl JwtAuthService {
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            lifetime_secs: i64::from(config.token_lifetime_minutes) * 60,
        }
    }

    fn issue(&self, username: &str) -> Result<IssuedToken, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: username.to_string(),
            exp: now + self.lifetime_secs,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_in: self.lifetime_secs,
        })
    }
}

impl AuthService for JwtAuthService {
    fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<IssuedToken>, AuthError> {
        if username != self.username || password != self.password {
            warn!(username, "Rejected login attempt");
            return Ok(None);
        }

        let token = self.issue(username)?;
        info!(username, "Issued access token");
        Ok(Some(token))
    }

    fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> JwtAuthService {
        JwtAuthService::new(&AuthConfig {
            username: "admin".to_string(),
            password: "admin".to_string(),
            jwt_secret: secret.to_string(),
            token_lifetime_minutes: 120,
        })
    }

    #[test]
    fn issues_token_for_matching_pair() {
        let auth = service("test-secret-that-is-long-enough");
        let issued = auth.authenticate("admin", "admin").unwrap().unwrap();
        assert_eq!(issued.expires_in, 7200);

        let claims = auth.validate_token(&issued.token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.exp - claims.iat, 7200);
    }

    #[test]
    fn both_values_must_match() {
        let auth = service("test-secret-that-is-long-enough");
        assert!(auth.authenticate("admin", "wrong").unwrap().is_none());
        assert!(auth.authenticate("wrong", "admin").unwrap().is_none());
        assert!(auth.authenticate("", "").unwrap().is_none());
    }

    #[test]
    fn rejects_token_from_other_secret() {
        let issuer = service("first-secret-that-is-long-enough");
        let verifier = service("second-secret-that-is-long-enough");

        let issued = issuer.authenticate("admin", "admin").unwrap().unwrap();
        assert!(matches!(
            verifier.validate_token(&issued.token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let auth = service("test-secret-that-is-long-enough");
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "admin".to_string(),
            exp: now - 3600,
            iat: now - 7200,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(&Header::default(), &claims, &auth.encoding_key).unwrap();

        assert!(matches!(
            auth.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn rejects_garbage() {
        let auth = service("test-secret-that-is-long-enough");
        assert!(auth.validate_token("not.a.token").is_err());
    }
}
