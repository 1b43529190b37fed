use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::{
    adapters::dto::media_dto::{
        DragEvent, DragRequest, MediaResponse, UploadResponse, UploadStateResponse,
    },
    application::{components::shell::AppShell, error::ApplicationError},
    domain::{config::gallery::GalleryConfig, models::file::FileData},
};

pub struct UploadController;

fn multipart_error(e: MultipartError, limit: usize) -> ApplicationError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApplicationError::PayloadTooLarge(format!(
            "Upload exceeds the {} MB limit",
            limit / (1024 * 1024)
        ))
    } else {
        ApplicationError::BadRequest(format!("Invalid file data: {}", e.body_text()))
    }
}

impl UploadController {
    /// POST /api/v1/media
    /// Multipart body with one `file` part per selected file.
    pub async fn upload_media(
        State(shell): State<Arc<AppShell>>,
        State(config): State<Arc<GalleryConfig>>,
        mut multipart: Multipart,
    ) -> Result<(StatusCode, Json<UploadResponse>), ApplicationError> {
        let uploader = shell.uploader();
        let limit = config.max_upload_bytes;
        let mut files = Vec::new();

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => return Err(uploader.reject(multipart_error(e, limit))),
            };
            if field.name() != Some("file") {
                continue;
            }

            let filename = field.file_name().unwrap_or("upload").to_string();
            let mime_type = field.content_type().map(|m| m.to_string());
            let content = field
                .bytes()
                .await
                .map_err(|e| uploader.reject(multipart_error(e, limit)))?;

            files.push(FileData::new(content.to_vec(), filename, mime_type));
        }

        info!("Received {} file(s) for upload", files.len());
        let items = uploader.submit_files(files).await?;

        Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                items: items.into_iter().map(MediaResponse::from).collect(),
            }),
        ))
    }

    /// POST /api/v1/upload/drag
    pub async fn drag(
        State(shell): State<Arc<AppShell>>,
        Json(body): Json<DragRequest>,
    ) -> Json<UploadStateResponse> {
        let uploader = shell.uploader();
        match body.event {
            DragEvent::Over => uploader.drag_over(),
            DragEvent::Leave => uploader.drag_leave(),
            DragEvent::Drop => uploader.drop_files(),
        }
        Json(UploadStateResponse::from(uploader.snapshot()))
    }

    /// DELETE /api/v1/upload/error
    pub async fn dismiss_error(State(shell): State<Arc<AppShell>>) -> StatusCode {
        shell.uploader().dismiss_error();
        StatusCode::NO_CONTENT
    }
}
