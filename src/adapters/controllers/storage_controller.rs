use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};

use crate::{adapters::state::AppState, application::error::ApplicationError};

pub struct StorageController;

impl StorageController {
    /// GET /storage/v1/object/public/{bucket}/{*key}
    /// Serves public objects when the in-memory backend is in use.
    pub async fn public_object(
        State(app_state): State<AppState>,
        Path((bucket, key)): Path<(String, String)>,
    ) -> Result<Response, ApplicationError> {
        let memory = app_state
            .memory
            .as_ref()
            .ok_or_else(|| ApplicationError::NotFound("Object not found".to_string()))?;

        if bucket != memory.bucket_name() {
            return Err(ApplicationError::NotFound(format!("Bucket {} not found", bucket)));
        }

        let object = memory
            .object(&key)
            .ok_or_else(|| ApplicationError::NotFound("Object not found".to_string()))?;

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, object.mime_type)
            .header(header::CONTENT_LENGTH, object.content.len())
            .body(Body::from(object.content))
            .map_err(|e| ApplicationError::UnknownFailure(e.to_string()))
    }
}
