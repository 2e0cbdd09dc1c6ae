//! HTTP API handlers for encore-web

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

pub mod artists;
pub mod forms;
pub mod health;
pub mod home;
pub mod shows;
pub mod ui;
pub mod venues;

/// Handler-level error: maps the common error taxonomy onto HTTP.
///
/// Internal causes are logged here and never echoed to the client.
#[derive(Debug)]
pub struct ApiError(pub encore_common::Error);

impl From<encore_common::Error> for ApiError {
    fn from(e: encore_common::Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use encore_common::Error;

        let (status, message) = match &self.0 {
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Error::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::DuplicateLink(_) => {
                (StatusCode::CONFLICT, "Duplicate link".to_string())
            }
            other => {
                error!("Internal error: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
