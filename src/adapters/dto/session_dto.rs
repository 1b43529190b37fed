use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    application::components::session::SessionState,
    domain::models::user::{Credentials, User},
};

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

impl From<SignInRequest> for Credentials {
    fn from(value: SignInRequest) -> Self {
        Credentials {
            email: value.email.trim().to_string(),
            password: value.password,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: Option<UserResponse>,
    #[serde(rename = "isLoading")]
    pub is_loading: bool,
}

impl From<SessionState> for SessionResponse {
    fn from(state: SessionState) -> Self {
        Self {
            user: state.current_user.map(UserResponse::from),
            is_loading: state.is_loading,
        }
    }
}
