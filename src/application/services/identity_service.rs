use async_trait::async_trait;
use tokio::sync::watch;

use crate::{
    application::error::ApplicationError,
    domain::models::user::{Credentials, User},
};

#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Resolves the user of the stored session, `None` when signed out.
    async fn current_user(&self) -> Result<Option<User>, ApplicationError>;
    async fn sign_in(&self, credentials: &Credentials) -> Result<User, ApplicationError>;
    async fn sign_up(&self, credentials: &Credentials) -> Result<User, ApplicationError>;
    async fn sign_out(&self) -> Result<(), ApplicationError>;
    /// Every sign in or sign out is published on this channel.
    fn on_auth_state_change(&self) -> watch::Receiver<Option<User>>;
}
