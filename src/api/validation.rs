use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::ApiError;

/// JSON body that has been deserialized and passed its declarative rules.
///
/// Malformed bodies are reported under the `body` field.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::field("body", rejection.body_text()))?;
        validate_payload(&value)?;
        Ok(Self(value))
    }
}

/// Query string counterpart of [`ValidatedJson`].
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::field("query", rejection.body_text()))?;
        validate_payload(&value)?;
        Ok(Self(value))
    }
}

/// Route parameters; ids that fail to parse are reported under `id`.
#[derive(Debug, Clone)]
pub struct ValidatedPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::field("id", rejection.body_text()))?;
        Ok(Self(value))
    }
}

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), ApiError> {
    payload.validate().map_err(ApiError::from)
}

/// `release_year` -> `releaseYear`.
pub fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{CastMemberCreateDto, SeriesCreateDto};

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("release_year"), "releaseYear");
        assert_eq!(camel_case("genre_id"), "genreId");
        assert_eq!(camel_case("name"), "name");
        assert_eq!(camel_case("_private"), "private");
    }

    #[test]
    fn test_validate_payload_reports_each_field() {
        let dto = SeriesCreateDto {
            title: String::new(),
            release_year: 1850,
            genre_id: 1,
        };

        let Err(ApiError::Validation(errors)) = validate_payload(&dto) else {
            panic!("expected validation error");
        };
        assert!(errors.contains_key("title"));
        assert!(errors.contains_key("releaseYear"));
        assert!(!errors.contains_key("genreId"));
    }

    #[test]
    fn test_unknown_position_is_rejected() {
        let dto = CastMemberCreateDto {
            name: "Bryan Cranston".to_string(),
            position: 9,
        };

        let Err(ApiError::Validation(errors)) = validate_payload(&dto) else {
            panic!("expected validation error");
        };
        assert_eq!(
            errors.get("position").map(String::as_str),
            Some("9 is not a valid cast position.")
        );
    }
}
