use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{
    adapters::dto::view_dto::{ToggleResponse, ViewResponse},
    application::components::shell::AppShell,
};

pub struct ViewController;

impl ViewController {
    /// GET /api/v1/view
    pub async fn get_view(State(shell): State<Arc<AppShell>>) -> Json<ViewResponse> {
        Json(ViewResponse::from(shell.view()))
    }

    /// POST /api/v1/upload/toggle
    pub async fn toggle_upload(State(shell): State<Arc<AppShell>>) -> Json<ToggleResponse> {
        Json(ToggleResponse {
            show_upload: shell.toggle_upload(),
        })
    }
}
