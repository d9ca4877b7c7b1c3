use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const VALIDATION_PROBLEM_TYPE: &str = "https://tools.ietf.org/html/rfc7231#section-6.5.1";
pub const VALIDATION_PROBLEM_TITLE: &str = "One or more validation errors occurred.";

/// Body of every 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub status: u16,
    pub trace_id: String,
    pub errors: BTreeMap<String, String>,
}

impl ProblemDetails {
    pub fn validation(trace_id: String, errors: BTreeMap<String, String>) -> Self {
        Self {
            kind: VALIDATION_PROBLEM_TYPE.to_string(),
            title: VALIDATION_PROBLEM_TITLE.to_string(),
            status: StatusCode::BAD_REQUEST.as_u16(),
            trace_id,
            errors,
        }
    }
}

/// 201 with a `Location` header pointing at the new resource.
pub fn created<T: Serialize>(location: String, body: T) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(body),
    )
        .into_response()
}
