use std::sync::{Arc, RwLock};

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;

use crate::{domain::config::gallery::SupabaseSecrets, services::error::BackendError};

/// Error body shapes returned by the Supabase gateways.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// HTTP client shared by the auth, storage and rest services.
///
/// Requests carry the signed-in user's access token once there is one, the
/// anon key otherwise, so row level security scopes every call to the user.
#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    api_key: String,
    access_token: Arc<RwLock<Option<String>>>,
}

impl SupabaseClient {
    pub fn new(secrets: SupabaseSecrets) -> Self {
        Self {
            client: Client::new(),
            base_url: secrets.url.trim_end_matches('/').to_string(),
            api_key: secrets.anon_key,
            access_token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_access_token(&self, token: Option<String>) {
        let mut guard = self
            .access_token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = token;
    }

    pub fn access_token(&self) -> Option<String> {
        self.access_token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let bearer = self.access_token().unwrap_or_else(|| self.api_key.clone());
        self.request_as(method, path, &bearer)
    }

    /// Request authorised with the anon key only, whatever the session holds.
    pub fn anon_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_as(method, path, &self.api_key)
    }

    fn request_as(&self, method: Method, path: &str, bearer: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", bearer))
    }

    /// Turns a non-success response into a `BackendError` carrying the gateway's message.
    pub async fn check(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let message = body
            .message
            .or(body.msg)
            .or(body.error_description)
            .or(body.error)
            .unwrap_or_else(|| format!("Request failed with status: {}", status));

        Err(match status.as_u16() {
            404 => BackendError::NotFound(message),
            401 | 403 => BackendError::Unauthorized(message),
            _ => BackendError::ProviderError(message),
        })
    }
}
