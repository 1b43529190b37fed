use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::{
    adapters::dto::session_dto::{SessionResponse, SignInRequest, UserResponse},
    application::{components::shell::AppShell, error::ApplicationError},
    domain::models::user::Credentials,
};

pub struct SessionController;

impl SessionController {
    /// GET /api/v1/session
    pub async fn get_session(State(shell): State<Arc<AppShell>>) -> Json<SessionResponse> {
        Json(SessionResponse::from(shell.session().snapshot()))
    }

    /// POST /api/v1/session
    pub async fn sign_in(
        State(shell): State<Arc<AppShell>>,
        Json(body): Json<SignInRequest>,
    ) -> Result<Json<UserResponse>, ApplicationError> {
        let credentials = Credentials::from(body);
        info!("Sign in requested for {}", credentials.email);
        let user = shell.session().sign_in(&credentials).await?;
        Ok(Json(UserResponse::from(user)))
    }

    /// POST /api/v1/session/signup
    pub async fn sign_up(
        State(shell): State<Arc<AppShell>>,
        Json(body): Json<SignInRequest>,
    ) -> Result<(StatusCode, Json<UserResponse>), ApplicationError> {
        let credentials = Credentials::from(body);
        if credentials.email.is_empty() || credentials.password.is_empty() {
            return Err(ApplicationError::BadRequest(
                "Email and password are required".to_string(),
            ));
        }

        let user = shell.session().sign_up(&credentials).await?;
        Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
    }

    /// DELETE /api/v1/session
    pub async fn sign_out(
        State(shell): State<Arc<AppShell>>,
    ) -> Result<StatusCode, ApplicationError> {
        shell.session().sign_out().await?;
        Ok(StatusCode::NO_CONTENT)
    }
}
