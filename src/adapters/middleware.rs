use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

use crate::application::{components::shell::AppShell, error::ApplicationError};

/// Rejects gallery requests until a user is signed in.
pub async fn require_session(
    State(shell): State<Arc<AppShell>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if shell.session().current_user().is_some() {
        return next.run(request).await;
    }

    warn!("Gallery request without a session: {}", request.uri().path());
    ApplicationError::AuthFailure("You must be logged in".to_string()).into_response()
}
