use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};
use tracing::{info, warn};

use crate::{
    application::{error::ApplicationError, services::IdentityService},
    domain::models::user::{Credentials, User},
};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub current_user: Option<User>,
    pub is_loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            current_user: None,
            is_loading: true,
        }
    }
}

/// Current-user state shared by the upload and gallery components.
pub struct SessionProvider {
    identity: Arc<dyn IdentityService>,
    state: watch::Sender<SessionState>,
}

impl SessionProvider {
    pub fn new(identity: Arc<dyn IdentityService>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self { identity, state }
    }

    /// Resolves the initial session. A failing identity backend reads as "signed out".
    pub async fn initialize(&self) {
        let current_user = match self.identity.current_user().await {
            Ok(user) => user,
            Err(e) => {
                warn!("Session check failed: {}", e);
                None
            }
        };

        if let Some(ref user) = current_user {
            info!("Restored session for {}", user.id);
        }
        self.set_user(current_user);
    }

    /// Forwards identity backend changes into this provider's state.
    pub fn listen(self: &Arc<Self>) -> JoinHandle<()> {
        let provider = Arc::clone(self);
        let mut changes = self.identity.on_auth_state_change();

        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let user = changes.borrow_and_update().clone();
                provider.set_user(user);
            }
        })
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().current_user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<User, ApplicationError> {
        let user = self.identity.sign_in(credentials).await?;
        self.set_user(Some(user.clone()));
        Ok(user)
    }

    /// A sign up without email confirmation pending also starts a session.
    pub async fn sign_up(&self, credentials: &Credentials) -> Result<User, ApplicationError> {
        let user = self.identity.sign_up(credentials).await?;
        if let Ok(Some(current)) = self.identity.current_user().await {
            self.set_user(Some(current));
        }
        Ok(user)
    }

    /// Clears the local session even when the identity backend call fails.
    pub async fn sign_out(&self) -> Result<(), ApplicationError> {
        let result = self.identity.sign_out().await;
        self.set_user(None);
        if result.is_ok() {
            info!("Signed out");
        }
        result
    }

    fn set_user(&self, current_user: Option<User>) {
        self.state.send_if_modified(|state| {
            let next = SessionState {
                current_user: current_user.clone(),
                is_loading: false,
            };
            if *state == next {
                return false;
            }
            *state = next;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{credentials, FailingIdentity};
    use crate::services::MemoryBackend;

    #[tokio::test]
    async fn loading_until_initialized() {
        let backend = Arc::new(MemoryBackend::new("http://localhost", "media"));
        let session = SessionProvider::new(backend);

        assert!(session.is_loading());
        assert_eq!(session.current_user(), None);

        session.initialize().await;
        assert!(!session.is_loading());
        assert_eq!(session.current_user(), None);
    }

    #[tokio::test]
    async fn identity_errors_read_as_signed_out() {
        let session = SessionProvider::new(Arc::new(FailingIdentity));
        session.initialize().await;

        assert!(!session.is_loading());
        assert_eq!(session.current_user(), None);
    }

    #[tokio::test]
    async fn sign_in_and_out_notify_dependents() {
        let backend = Arc::new(MemoryBackend::new("http://localhost", "media"));
        backend.sign_up(&credentials()).await.unwrap();
        backend.sign_out().await.unwrap();

        let session = SessionProvider::new(backend);
        session.initialize().await;
        let mut changes = session.subscribe();
        changes.borrow_and_update();

        let user = session.sign_in(&credentials()).await.unwrap();
        assert!(changes.has_changed().unwrap());
        assert_eq!(changes.borrow_and_update().current_user, Some(user));

        session.sign_out().await.unwrap();
        assert!(changes.has_changed().unwrap());
        assert_eq!(changes.borrow_and_update().current_user, None);
    }

    #[tokio::test]
    async fn sign_out_clears_local_state_when_backend_fails() {
        let session = SessionProvider::new(Arc::new(FailingIdentity));
        session.set_user(Some(User {
            id: uuid::Uuid::new_v4(),
            email: None,
        }));

        assert!(session.sign_out().await.is_err());
        assert_eq!(session.current_user(), None);
    }

    #[tokio::test]
    async fn listener_follows_backend_changes() {
        let backend = Arc::new(MemoryBackend::new("http://localhost", "media"));
        let session = Arc::new(SessionProvider::new(backend.clone()));
        session.initialize().await;
        let handle = session.listen();
        let mut changes = session.subscribe();
        changes.borrow_and_update();

        let user = backend.sign_up(&credentials()).await.unwrap();
        changes.changed().await.unwrap();
        assert_eq!(session.current_user(), Some(user));

        handle.abort();
    }
}
