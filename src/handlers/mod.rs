pub mod admin;
pub mod public;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::error::ApiError;

/// Structured failure that carries the submitted form values back to the
/// caller so the form can be re-displayed pre-filled.
pub fn failure_with_values(err: ApiError, values: Value) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut body = err.to_json();
    body["values"] = values;
    (status, Json(body)).into_response()
}
