use axum::extract::FromRef;
use std::sync::Arc;

use crate::{
    application::components::shell::AppShell,
    domain::config::gallery::{GalleryConfig, Provider},
    services::MemoryBackend,
};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub config: Arc<GalleryConfig>,
    pub shell: Arc<AppShell>,
    pub memory: Option<Arc<MemoryBackend>>,
}

impl AppState {
    pub fn provider(&self) -> &Provider {
        &self.config.provider
    }
}
