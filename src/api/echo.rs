//! Echo endpoint

use axum::{
    body::Bytes,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use serde::de::IgnoredAny;

use crate::error::{AppError, AppResult};

/// Return the request body unchanged, byte for byte, if it is valid JSON
#[utoipa::path(
    post,
    path = "/echo",
    tag = "health",
    request_body(content = String, content_type = "application/json", description = "Any JSON document"),
    responses(
        (status = 200, description = "The same JSON document"),
        (status = 400, description = "Body is not valid JSON", body = crate::error::ErrorResponse)
    )
)]
pub async fn echo(body: Bytes) -> AppResult<Response> {
    serde_json::from_slice::<IgnoredAny>(&body)
        .map_err(|_| AppError::Validation("Invalid JSON".to_string()))?;

    Ok(([(CONTENT_TYPE, "application/json")], body).into_response())
}
