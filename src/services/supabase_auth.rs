use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::Method;
use serde::Deserialize;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    application::{error::ApplicationError, services::IdentityService},
    domain::models::user::{Credentials, User},
    services::{error::BackendError, supabase_client::SupabaseClient},
};

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
    email: Option<String>,
}

impl From<AuthUser> for User {
    fn from(value: AuthUser) -> Self {
        User {
            id: value.id,
            email: value.email,
        }
    }
}

/// Access tokens are renewed this long before they expire.
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
struct SessionResponse {
    access_token: String,
    refresh_token: String,
    /// Seconds until `access_token` expires.
    expires_in: i64,
    user: AuthUser,
}

/// Sign up answers with a session when auto-confirm is on, with the bare user otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(SessionResponse),
    User(AuthUser),
}

/// How long to wait before renewing a token that expires at `expires_at`.
///
/// Short lived tokens are renewed halfway through their lifetime.
fn refresh_delay(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    let lifetime = expires_at - now;
    let margin = TimeDelta::seconds(REFRESH_MARGIN_SECS);
    let wait = if lifetime > margin * 2 {
        lifetime - margin
    } else {
        lifetime / 2
    };
    wait.to_std().unwrap_or_default()
}

async fn refresh_session(
    client: &SupabaseClient,
    refresh_token: &str,
) -> Result<SessionResponse, BackendError> {
    let response = client
        .anon_request(Method::POST, "/auth/v1/token?grant_type=refresh_token")
        .json(&serde_json::json!({ "refresh_token": refresh_token }))
        .send()
        .await?;

    let response = SupabaseClient::check(response).await?;
    Ok(response.json().await?)
}

/// Renews the access token ahead of every expiry until a renewal fails,
/// which ends the session.
async fn keep_session_fresh(
    client: SupabaseClient,
    state: Arc<watch::Sender<Option<User>>>,
    mut refresh_token: String,
    mut expires_at: DateTime<Utc>,
) {
    loop {
        tokio::time::sleep(refresh_delay(expires_at, Utc::now())).await;

        match refresh_session(&client, &refresh_token).await {
            Ok(session) => {
                expires_at = Utc::now() + TimeDelta::seconds(session.expires_in);
                refresh_token = session.refresh_token;
                client.set_access_token(Some(session.access_token));
                state.send_replace(Some(User::from(session.user)));
                debug!("Access token renewed until {}", expires_at);
            }
            Err(e) => {
                warn!("Session renewal failed, signing out: {}", e);
                client.set_access_token(None);
                state.send_replace(None);
                return;
            }
        }
    }
}

pub struct SupabaseAuthService {
    client: SupabaseClient,
    state: Arc<watch::Sender<Option<User>>>,
    renewal: Mutex<Option<JoinHandle<()>>>,
}

impl SupabaseAuthService {
    pub fn new(client: SupabaseClient) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            client,
            state: Arc::new(state),
            renewal: Mutex::new(None),
        }
    }

    fn renewal(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.renewal
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn start_session(&self, session: SessionResponse) -> User {
        let expires_at = Utc::now() + TimeDelta::seconds(session.expires_in);
        self.client.set_access_token(Some(session.access_token));
        let user = User::from(session.user);
        self.state.send_replace(Some(user.clone()));

        let task = tokio::spawn(keep_session_fresh(
            self.client.clone(),
            self.state.clone(),
            session.refresh_token,
            expires_at,
        ));
        if let Some(previous) = self.renewal().replace(task) {
            previous.abort();
        }
        user
    }

    fn end_session(&self) {
        if let Some(task) = self.renewal().take() {
            task.abort();
        }
        self.client.set_access_token(None);
        self.state.send_replace(None);
    }
}

#[async_trait]
impl IdentityService for SupabaseAuthService {
    async fn current_user(&self) -> Result<Option<User>, ApplicationError> {
        if self.client.access_token().is_none() {
            return Ok(None);
        }

        let response = self
            .client
            .request(Method::GET, "/auth/v1/user")
            .send()
            .await
            .map_err(|e| BackendError::from(e).into_identity())?;

        let response = SupabaseClient::check(response)
            .await
            .map_err(BackendError::into_identity)?;

        let user: AuthUser = response
            .json()
            .await
            .map_err(|e| BackendError::from(e).into_identity())?;

        Ok(Some(user.into()))
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<User, ApplicationError> {
        let response = self
            .client
            .request(Method::POST, "/auth/v1/token?grant_type=password")
            .json(&serde_json::json!({
                "email": credentials.email,
                "password": credentials.password,
            }))
            .send()
            .await
            .map_err(|e| BackendError::from(e).into_identity())?;

        let response = SupabaseClient::check(response)
            .await
            .map_err(BackendError::into_identity)?;

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| BackendError::from(e).into_identity())?;

        let user = self.start_session(session);
        info!("Signed in as {}", user.id);
        Ok(user)
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<User, ApplicationError> {
        let response = self
            .client
            .request(Method::POST, "/auth/v1/signup")
            .json(&serde_json::json!({
                "email": credentials.email,
                "password": credentials.password,
            }))
            .send()
            .await
            .map_err(|e| BackendError::from(e).into_identity())?;

        let response = SupabaseClient::check(response)
            .await
            .map_err(BackendError::into_identity)?;

        let body: SignUpResponse = response
            .json()
            .await
            .map_err(|e| BackendError::from(e).into_identity())?;

        match body {
            SignUpResponse::Session(session) => {
                let user = self.start_session(session);
                info!("Signed up and signed in as {}", user.id);
                Ok(user)
            }
            SignUpResponse::User(user) => {
                info!("Signed up {}, email confirmation pending", user.id);
                Ok(user.into())
            }
        }
    }

    async fn sign_out(&self) -> Result<(), ApplicationError> {
        if self.client.access_token().is_none() {
            self.end_session();
            return Ok(());
        }

        let result = match self
            .client
            .request(Method::POST, "/auth/v1/logout")
            .send()
            .await
        {
            Ok(response) => SupabaseClient::check(response).await.map(|_| ()),
            Err(e) => Err(BackendError::from(e)),
        };

        // The local session is cleared whatever the backend answered.
        self.end_session();

        result.map_err(|e| {
            warn!("Remote sign out failed: {}", e);
            e.into_identity()
        })
    }

    fn on_auth_state_change(&self) -> watch::Receiver<Option<User>> {
        self.state.subscribe()
    }
}
