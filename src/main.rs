mod adapters;
mod application;
mod domain;
mod services;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use adapters::{routes::router, state::AppState};
use application::components::shell::AppShell;
use axum::http::HeaderValue;
use domain::config::gallery::GalleryConfig;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

fn cors_layer(config: &GalleryConfig) -> Result<CorsLayer, String> {
    match &config.cors_allowed_origins {
        Some(allowed_origins) => {
            let origins = allowed_origins
                .iter()
                .map(|s| {
                    s.parse::<HeaderValue>()
                        .map_err(|_| format!("Invalid CORS origin: {}", s))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any))
        }
        // Allow all origins if not specified (only for development)
        None => Ok(CorsLayer::permissive()),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match GalleryConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Starting media-gallery with {:?} backend (bucket '{}', table '{}')",
        config.provider,
        config.bucket_name,
        config.table_name
    );

    let cors = match cors_layer(&config) {
        Ok(cors) => cors,
        Err(e) => {
            tracing::error!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    let backend = match services::create_backend(&config) {
        Ok(backend) => backend,
        Err(e) => {
            tracing::error!("ERROR: Failed to create backend: {}", e);
            std::process::exit(1);
        }
    };

    let memory = backend.memory.clone();
    let shell = AppShell::new(backend);
    let _listeners = shell.start().await;
    tracing::info!("Session resolved, gallery loaded");

    let port = config.port;
    let app_state = AppState {
        config: Arc::new(config),
        shell,
        memory,
    };

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("ERROR: Failed to bind to port {}: {}", port, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on 0.0.0.0:{}", port);

    if let Err(e) = axum::serve(listener, router(app_state, cors)).await {
        tracing::error!("Server error: {}", e);
    }
}
