use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use super::validation::ValidatedJson;
use super::{ApiError, AppState};
use crate::services::AuthError;

#[derive(Debug, Deserialize, Validate)]
pub struct UserCredentials {
    #[validate(length(min = 1, max = 64, message = "Username must be between 1 and 64 characters."))]
    pub username: String,
    #[validate(length(min = 1, max = 64, message = "Password must be between 1 and 64 characters."))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

/// Rejects requests without a valid `Authorization: Bearer <token>` header.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(&headers).ok_or(AuthError::MissingToken)?;
    let claims = state.auth_service().validate_token(token)?;

    tracing::Span::current().record("user_id", claims.sub.as_str());
    Ok(next.run(request).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// POST /auth/login
/// Exchanges the configured credential pair for a bearer token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(credentials): ValidatedJson<UserCredentials>,
) -> Result<Json<LoginResponse>, ApiError> {
    let issued = state
        .auth_service()
        .authenticate(&credentials.username, &credentials.password)?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    Ok(Json(LoginResponse {
        token: issued.token,
        token_type: "Bearer".to_string(),
        expires_in: issued.expires_in,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer eyJhbGciOiJIUzI1NiJ9.e30.sig"),
        );
        assert_eq!(extract_bearer(&headers), Some("eyJhbGciOiJIUzI1NiJ9.e30.sig"));
    }
}
