use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::watch;
use tracing::info;
use uuid::Uuid;

use crate::{
    application::{
        error::ApplicationError,
        repositories::metadata_repository::{MetadataRepository, SortDirection},
        services::{IdentityService, StorageService},
    },
    domain::models::{
        file::FileData,
        media::{MediaItem, NewMediaItem},
        user::{Credentials, User},
    },
};

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content: Vec<u8>,
    pub mime_type: String,
}

#[derive(Default)]
struct MemoryState {
    accounts: HashMap<String, (String, User)>,
    objects: HashMap<String, StoredObject>,
    rows: Vec<MediaItem>,
}

/// In-process stand-in for the hosted backend: identity, one bucket and one table.
pub struct MemoryBackend {
    public_base: String,
    bucket_name: String,
    state: Mutex<MemoryState>,
    session: watch::Sender<Option<User>>,
}

impl MemoryBackend {
    pub fn new(public_base: &str, bucket_name: &str) -> Self {
        let (session, _) = watch::channel(None);
        Self {
            public_base: public_base.trim_end_matches('/').to_string(),
            bucket_name: bucket_name.to_string(),
            state: Mutex::new(MemoryState::default()),
            session,
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.lock().objects.get(key).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.lock().objects.len()
    }

    pub fn row_count(&self) -> usize {
        self.lock().rows.len()
    }
}

#[async_trait]
impl IdentityService for MemoryBackend {
    async fn current_user(&self) -> Result<Option<User>, ApplicationError> {
        Ok(self.session.borrow().clone())
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<User, ApplicationError> {
        let user = {
            let state = self.lock();
            match state.accounts.get(&credentials.email) {
                Some((password, user)) if *password == credentials.password => user.clone(),
                _ => {
                    return Err(ApplicationError::AuthFailure(
                        "Invalid login credentials".to_string(),
                    ))
                }
            }
        };

        self.session.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<User, ApplicationError> {
        let user = {
            let mut state = self.lock();
            if state.accounts.contains_key(&credentials.email) {
                return Err(ApplicationError::AuthFailure(
                    "User already registered".to_string(),
                ));
            }

            let user = User {
                id: Uuid::new_v4(),
                email: Some(credentials.email.clone()),
            };
            state.accounts.insert(
                credentials.email.clone(),
                (credentials.password.clone(), user.clone()),
            );
            user
        };

        info!("Registered in-memory account {}", user.id);
        self.session.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), ApplicationError> {
        self.session.send_replace(None);
        Ok(())
    }

    fn on_auth_state_change(&self) -> watch::Receiver<Option<User>> {
        self.session.subscribe()
    }
}

#[async_trait]
impl StorageService for MemoryBackend {
    async fn upload(&self, key: &str, file_data: &FileData) -> Result<(), ApplicationError> {
        let mut state = self.lock();
        if state.objects.contains_key(key) {
            return Err(ApplicationError::StorageFailure(
                "The resource already exists".to_string(),
            ));
        }

        state.objects.insert(
            key.to_string(),
            StoredObject {
                content: file_data.content.clone(),
                mime_type: file_data.mime_type.clone(),
            },
        );
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.public_base, self.bucket_name, key
        )
    }

    async fn remove(&self, keys: &[String]) -> Result<(), ApplicationError> {
        let mut state = self.lock();
        for key in keys {
            state.objects.remove(key);
        }
        Ok(())
    }
}

#[async_trait]
impl MetadataRepository for MemoryBackend {
    async fn insert(&self, record: NewMediaItem) -> Result<MediaItem, ApplicationError> {
        let mut state = self.lock();
        if state.rows.iter().any(|r| r.file_path == record.file_path) {
            return Err(ApplicationError::MetadataFailure(format!(
                "duplicate key value violates unique constraint on file_path {}",
                record.file_path
            )));
        }

        let item = record.into_item(Uuid::new_v4(), Utc::now());
        state.rows.push(item.clone());
        Ok(item)
    }

    async fn list(
        &self,
        owner: Uuid,
        direction: SortDirection,
    ) -> Result<Vec<MediaItem>, ApplicationError> {
        let state = self.lock();
        let mut rows: Vec<MediaItem> = state
            .rows
            .iter()
            .filter(|r| r.user_id == owner)
            .cloned()
            .collect();

        // Stable sorts; ties keep insertion order in the requested direction.
        match direction {
            SortDirection::Ascending => rows.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortDirection::Descending => {
                rows.reverse();
                rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
        }
        Ok(rows)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApplicationError> {
        let mut state = self.lock();
        let before = state.rows.len();
        state.rows.retain(|r| r.id != id);

        if state.rows.len() == before {
            return Err(ApplicationError::MetadataFailure(format!(
                "Not found: media {}",
                id
            )));
        }
        Ok(())
    }
}
