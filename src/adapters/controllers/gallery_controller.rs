use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use uuid::Uuid;

use crate::{
    adapters::dto::media_dto::{DeleteQuery, DeleteResponse, GalleryResponse, KeyRequest},
    application::{
        components::{
            gallery::{DeleteOutcome, Key},
            shell::AppShell,
        },
        error::ApplicationError,
    },
};

pub struct GalleryController;

impl GalleryController {
    fn snapshot(shell: &AppShell) -> Json<GalleryResponse> {
        Json(GalleryResponse::from(shell.gallery().snapshot()))
    }

    fn confirmed(query: &DeleteQuery) -> impl Fn(&str) -> bool + Send + Sync {
        let confirm = query.confirm.unwrap_or(false);
        move |_: &str| confirm
    }

    fn delete_response(outcome: DeleteOutcome) -> Json<DeleteResponse> {
        Json(match outcome {
            DeleteOutcome::Deleted(item) => DeleteResponse {
                deleted: true,
                id: Some(item.id),
            },
            DeleteOutcome::Cancelled => DeleteResponse {
                deleted: false,
                id: None,
            },
        })
    }

    /// GET /api/v1/media
    /// Shares its path with the public upload route, so the session is checked here.
    pub async fn get_gallery(
        State(shell): State<Arc<AppShell>>,
    ) -> Result<Json<GalleryResponse>, ApplicationError> {
        if shell.session().current_user().is_none() {
            return Err(ApplicationError::AuthFailure(
                "You must be logged in".to_string(),
            ));
        }
        Ok(Self::snapshot(&shell))
    }

    /// POST /api/v1/media/refresh
    pub async fn refresh(State(shell): State<Arc<AppShell>>) -> Json<GalleryResponse> {
        shell.gallery().refresh().await;
        Self::snapshot(&shell)
    }

    /// POST /api/v1/gallery/open/{index}
    pub async fn open(
        State(shell): State<Arc<AppShell>>,
        Path(index): Path<usize>,
    ) -> Result<Json<GalleryResponse>, ApplicationError> {
        shell.gallery().open(index)?;
        Ok(Self::snapshot(&shell))
    }

    /// POST /api/v1/gallery/next
    pub async fn next(State(shell): State<Arc<AppShell>>) -> Json<GalleryResponse> {
        shell.gallery().next();
        Self::snapshot(&shell)
    }

    /// POST /api/v1/gallery/previous
    pub async fn previous(State(shell): State<Arc<AppShell>>) -> Json<GalleryResponse> {
        shell.gallery().previous();
        Self::snapshot(&shell)
    }

    /// POST /api/v1/gallery/close
    pub async fn close(State(shell): State<Arc<AppShell>>) -> Json<GalleryResponse> {
        shell.gallery().close();
        Self::snapshot(&shell)
    }

    /// POST /api/v1/gallery/key
    pub async fn key(
        State(shell): State<Arc<AppShell>>,
        Json(body): Json<KeyRequest>,
    ) -> Json<GalleryResponse> {
        shell.gallery().handle_key(Key::from_name(&body.key));
        Self::snapshot(&shell)
    }

    /// GET /api/v1/gallery/download
    pub async fn download(
        State(shell): State<Arc<AppShell>>,
    ) -> Result<Redirect, ApplicationError> {
        let url = shell.gallery().download_url()?;
        Ok(Redirect::to(&url))
    }

    /// DELETE /api/v1/gallery/selected?confirm=true
    pub async fn delete_selected(
        State(shell): State<Arc<AppShell>>,
        Query(query): Query<DeleteQuery>,
    ) -> Result<Json<DeleteResponse>, ApplicationError> {
        let prompt = Self::confirmed(&query);
        let outcome = shell.gallery().delete_selected(&prompt).await?;
        Ok(Self::delete_response(outcome))
    }

    /// DELETE /api/v1/media/{id}?confirm=true
    pub async fn delete_media(
        State(shell): State<Arc<AppShell>>,
        Path(id): Path<Uuid>,
        Query(query): Query<DeleteQuery>,
    ) -> Result<Json<DeleteResponse>, ApplicationError> {
        let prompt = Self::confirmed(&query);
        let outcome = shell.gallery().delete(id, &prompt).await?;
        Ok(Self::delete_response(outcome))
    }

    /// DELETE /api/v1/gallery/alert
    pub async fn dismiss_alert(State(shell): State<Arc<AppShell>>) -> StatusCode {
        shell.gallery().dismiss_alert();
        StatusCode::NO_CONTENT
    }
}
