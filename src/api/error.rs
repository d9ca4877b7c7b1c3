use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use std::collections::BTreeMap;
use std::fmt;
use validator::ValidationErrors;

use super::ProblemDetails;
use super::observability::current_request_id;
use super::validation::camel_case;
use crate::domain::UnknownCastPosition;
use crate::services::AuthError;

/// Field key reported when a save touched no rows.
pub const NOT_SAVED_FIELD: &str = "Database Error";

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    /// Field name to message.
    Validation(BTreeMap<String, String>),

    /// A save completed without affecting any row.
    NotSaved(String),

    Unauthorized(String),

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Validation(errors) => {
                write!(f, "Validation error:")?;
                for (field, message) in errors {
                    write!(f, " {}: {};", field, message)?;
                }
                Ok(())
            }
            ApiError::NotSaved(msg) => write!(f, "Not saved: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(msg) => {
                tracing::debug!("Not found: {}", msg);
                StatusCode::NOT_FOUND.into_response()
            }
            ApiError::Validation(errors) => bad_request(errors),
            ApiError::NotSaved(msg) => {
                tracing::warn!("Save affected no rows: {}", msg);
                bad_request(BTreeMap::from([(
                    NOT_SAVED_FIELD.to_string(),
                    "Database update failed.".to_string(),
                )]))
            }
            ApiError::Unauthorized(msg) => {
                tracing::debug!("Unauthorized: {}", msg);
                StatusCode::UNAUTHORIZED.into_response()
            }
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

fn bad_request(errors: BTreeMap<String, String>) -> Response {
    let body = ProblemDetails::validation(current_request_id().unwrap_or_default(), errors);
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        ApiError::DatabaseError(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Signing(msg) => ApiError::InternalError(msg),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

impl From<UnknownCastPosition> for ApiError {
    fn from(err: UnknownCastPosition) -> Self {
        ApiError::field("position", err.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let message = errors
                    .first()
                    .map(|error| {
                        error
                            .message
                            .as_ref()
                            .map_or_else(|| error.code.to_string(), ToString::to_string)
                    })
                    .unwrap_or_default();
                (camel_case(&field), message)
            })
            .collect();
        ApiError::Validation(fields)
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    /// Single field validation failure.
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation(BTreeMap::from([(name.into(), message.into())]))
    }

    pub fn not_saved(resource: &str) -> Self {
        ApiError::NotSaved(format!("{} was not persisted", resource))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}
