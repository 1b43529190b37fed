use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::adapters::{
    controllers::{
        gallery_controller::GalleryController, health_controller::HealthController,
        session_controller::SessionController, storage_controller::StorageController,
        upload_controller::UploadController, view_controller::ViewController,
    },
    middleware::require_session,
    state::AppState,
};

pub fn router(app_state: AppState, cors: CorsLayer) -> Router {
    let upload_limit = app_state.config.max_upload_bytes;

    // Gallery routes need a signed-in user
    let gallery_routes = Router::new()
        .route("/api/v1/media/refresh", post(GalleryController::refresh))
        .route("/api/v1/media/{id}", delete(GalleryController::delete_media))
        .route("/api/v1/gallery/open/{index}", post(GalleryController::open))
        .route("/api/v1/gallery/next", post(GalleryController::next))
        .route("/api/v1/gallery/previous", post(GalleryController::previous))
        .route("/api/v1/gallery/close", post(GalleryController::close))
        .route("/api/v1/gallery/key", post(GalleryController::key))
        .route("/api/v1/gallery/download", get(GalleryController::download))
        .route(
            "/api/v1/gallery/selected",
            delete(GalleryController::delete_selected),
        )
        .route(
            "/api/v1/gallery/alert",
            delete(GalleryController::dismiss_alert),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_session,
        ));

    let public_routes = Router::new()
        .route("/api/v1/health", get(HealthController::health_check))
        .route("/api/v1/view", get(ViewController::get_view))
        .route(
            "/api/v1/session",
            get(SessionController::get_session)
                .post(SessionController::sign_in)
                .delete(SessionController::sign_out),
        )
        .route("/api/v1/session/signup", post(SessionController::sign_up))
        .route("/api/v1/upload/toggle", post(ViewController::toggle_upload))
        .route("/api/v1/upload/drag", post(UploadController::drag))
        .route(
            "/api/v1/upload/error",
            delete(UploadController::dismiss_error),
        )
        .route(
            "/api/v1/media",
            get(GalleryController::get_gallery)
                .post(UploadController::upload_media)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/storage/v1/object/public/{bucket}/{*key}",
            get(StorageController::public_object),
        );

    Router::new()
        .merge(gallery_routes)
        .merge(public_routes)
        .layer(cors)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        application::components::shell::AppShell,
        domain::config::gallery::GalleryConfig,
        services::{Backend, MemoryBackend},
    };

    const BOUNDARY: &str = "gallery-test-boundary";

    fn app() -> (Router, Arc<AppShell>) {
        app_with_upload_limit(None)
    }

    fn app_with_upload_limit(limit: Option<&str>) -> (Router, Arc<AppShell>) {
        let config = GalleryConfig::from_lookup(|name| match name {
            "GALLERY_BACKEND" => Some("memory".to_string()),
            "MAX_UPLOAD_BYTES" => limit.map(str::to_string),
            _ => None,
        })
        .unwrap();
        let memory = Arc::new(MemoryBackend::new("http://localhost:8080", "media"));
        let shell = AppShell::new(Backend::memory(memory.clone()));
        let state = AppState {
            config: Arc::new(config),
            shell: shell.clone(),
            memory: Some(memory),
        };
        (router(state, CorsLayer::permissive()), shell)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn upload_request(files: &[(&str, &str, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, mime, content) in files {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    BOUNDARY, name, mime
                )
                .as_bytes(),
            );
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/media")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn signed_up(app: &Router) {
        let (status, _) = send(
            app,
            json_request(
                Method::POST,
                "/api/v1/session/signup",
                json!({"email": "ada@example.com", "password": "correct horse"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn view_reflects_session() {
        let (app, shell) = app();

        let (_, view) = send(&app, empty_request(Method::GET, "/api/v1/view")).await;
        assert_eq!(view["state"], "loading");

        shell.session().initialize().await;
        let (_, view) = send(&app, empty_request(Method::GET, "/api/v1/view")).await;
        assert_eq!(view["state"], "signedOut");

        signed_up(&app).await;
        let (_, view) = send(&app, empty_request(Method::GET, "/api/v1/view")).await;
        assert_eq!(view["state"], "ready");
        assert_eq!(view["user"]["email"], "ada@example.com");
        assert_eq!(view["showUpload"], false);

        let (_, toggled) = send(&app, empty_request(Method::POST, "/api/v1/upload/toggle")).await;
        assert_eq!(toggled["showUpload"], true);

        let (status, _) = send(&app, empty_request(Method::DELETE, "/api/v1/session")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, session) = send(&app, empty_request(Method::GET, "/api/v1/session")).await;
        assert_eq!(session["user"], Value::Null);
        assert_eq!(session["isLoading"], false);
    }

    #[tokio::test]
    async fn upload_without_session_surfaces_banner() {
        let (app, shell) = app();
        shell.session().initialize().await;

        let (status, body) = send(&app, upload_request(&[("beach.jpg", "image/jpeg", b"jpg".as_slice())])).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "You must be logged in to upload files");

        let (status, _) = send(&app, empty_request(Method::GET, "/api/v1/media")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = send(&app, empty_request(Method::POST, "/api/v1/gallery/next")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn photos_above_two_megabytes_upload() {
        let (app, shell) = app();
        shell.session().initialize().await;
        signed_up(&app).await;

        let photo = vec![0xAB_u8; 3 * 1024 * 1024];
        let (status, body) = send(
            &app,
            upload_request(&[("photo.jpg", "image/jpeg", photo.as_slice())]),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["items"][0]["fileSize"], 3 * 1024 * 1024);
        assert_eq!(shell.uploader().snapshot().error, None);
    }

    #[tokio::test]
    async fn oversized_upload_surfaces_banner() {
        let (app, shell) = app_with_upload_limit(Some("1048576"));
        shell.session().initialize().await;
        signed_up(&app).await;

        let video = vec![0_u8; 2 * 1024 * 1024];
        let (status, body) = send(
            &app,
            upload_request(&[("clip.mp4", "video/mp4", video.as_slice())]),
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "Upload exceeds the 1 MB limit");
        assert_eq!(
            shell.uploader().snapshot().error.as_deref(),
            Some("Upload exceeds the 1 MB limit")
        );
        assert_eq!(shell.gallery().snapshot().items.len(), 0);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let (app, shell) = app();
        shell.session().initialize().await;
        signed_up(&app).await;
        send(&app, empty_request(Method::DELETE, "/api/v1/session")).await;

        let (status, body) = send(
            &app,
            json_request(
                Method::POST,
                "/api/v1/session",
                json!({"email": "ada@example.com", "password": "nope"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid login credentials");
    }

    #[tokio::test]
    async fn upload_browse_download_delete() {
        let (app, shell) = app();
        shell.session().initialize().await;
        signed_up(&app).await;

        let (status, body) = send(
            &app,
            upload_request(&[
                ("beach.jpg", "image/jpeg", b"jpeg-bytes".as_slice()),
                ("clip.mov", "video/quicktime", b"mov-bytes".as_slice()),
            ]),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["items"][0]["fileType"], "image");
        assert!(body["items"][0]["thumbnailUrl"].is_string());
        assert_eq!(body["items"][1]["fileType"], "video");
        assert_eq!(body["items"][1]["thumbnailUrl"], Value::Null);

        let (_, gallery) = send(&app, empty_request(Method::POST, "/api/v1/media/refresh")).await;
        assert_eq!(gallery["state"], "loaded");
        assert_eq!(gallery["items"].as_array().unwrap().len(), 2);
        assert_eq!(gallery["items"][0]["title"], "clip.mov");

        let (_, gallery) = send(&app, empty_request(Method::POST, "/api/v1/gallery/open/1")).await;
        assert_eq!(gallery["state"], "viewing");
        assert_eq!(gallery["selectedIndex"], 1);
        assert_eq!(gallery["hasNext"], false);

        let (_, gallery) = send(
            &app,
            json_request(Method::POST, "/api/v1/gallery/key", json!({"key": "ArrowRight"})),
        )
        .await;
        assert_eq!(gallery["selectedIndex"], 1);

        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, "/api/v1/gallery/download"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
        let path = location.strip_prefix("http://localhost:8080").unwrap().to_string();

        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, &path))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"jpeg-bytes");

        let (_, outcome) = send(&app, empty_request(Method::DELETE, "/api/v1/gallery/selected")).await;
        assert_eq!(outcome["deleted"], false);

        let (status, outcome) = send(
            &app,
            empty_request(Method::DELETE, "/api/v1/gallery/selected?confirm=true"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["deleted"], true);

        let (_, gallery) = send(&app, empty_request(Method::POST, "/api/v1/media/refresh")).await;
        assert_eq!(gallery["items"].as_array().unwrap().len(), 1);

        let (status, _) = send(&app, empty_request(Method::GET, &path)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn deleting_unknown_media_is_not_found() {
        let (app, shell) = app();
        shell.session().initialize().await;
        signed_up(&app).await;
        send(&app, empty_request(Method::POST, "/api/v1/media/refresh")).await;

        let (status, body) = send(
            &app,
            empty_request(
                Method::DELETE,
                &format!("/api/v1/media/{}?confirm=true", uuid::Uuid::new_v4()),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("not found"));

        let (_, gallery) = send(&app, empty_request(Method::GET, "/api/v1/media")).await;
        assert_eq!(gallery["alert"], "Failed to delete media");
    }

    #[tokio::test]
    async fn drag_events_update_upload_state() {
        let (app, _shell) = app();

        let (_, state) = send(
            &app,
            json_request(Method::POST, "/api/v1/upload/drag", json!({"event": "over"})),
        )
        .await;
        assert_eq!(state["isDragging"], true);

        let (_, state) = send(
            &app,
            json_request(Method::POST, "/api/v1/upload/drag", json!({"event": "drop"})),
        )
        .await;
        assert_eq!(state["isDragging"], false);
    }

    #[tokio::test]
    async fn health_reports_backend() {
        let (app, _shell) = app();
        let (status, body) = send(&app, empty_request(Method::GET, "/api/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["provider"], "Memory");
        assert_eq!(body["bucketName"], "media");
        assert_eq!(body["signedIn"], false);
        assert_eq!(body["memory"]["objects"], 0);
    }
}
