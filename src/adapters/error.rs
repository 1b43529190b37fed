use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::application::error::ApplicationError;

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let status = match self {
            ApplicationError::NotAuthenticated => {
                warn!("Request without a session");
                StatusCode::UNAUTHORIZED
            }
            ApplicationError::AuthFailure(ref msg) => {
                warn!("Authentication failed: {}", msg);
                StatusCode::UNAUTHORIZED
            }
            ApplicationError::NotFound(ref msg) => {
                warn!("Not found: {}", msg);
                StatusCode::NOT_FOUND
            }
            ApplicationError::BadRequest(ref msg) => {
                warn!("Bad request: {}", msg);
                StatusCode::BAD_REQUEST
            }
            ApplicationError::PayloadTooLarge(ref msg) => {
                warn!("Payload too large: {}", msg);
                StatusCode::PAYLOAD_TOO_LARGE
            }
            ApplicationError::StorageFailure(ref msg) => {
                error!("Storage error: {}", msg);
                StatusCode::BAD_GATEWAY
            }
            ApplicationError::MetadataFailure(ref msg) => {
                error!("Metadata error: {}", msg);
                StatusCode::BAD_GATEWAY
            }
            ApplicationError::UnknownFailure(ref msg) => {
                error!("Unexpected error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
