//! Fixtures shared by the unit tests.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use tokio::sync::{oneshot, watch};
use uuid::Uuid;

use crate::{
    application::{
        components::session::SessionProvider,
        error::ApplicationError,
        repositories::metadata_repository::{MetadataRepository, SortDirection},
        services::{IdentityService, StorageService},
    },
    domain::models::{
        file::FileData,
        media::{MediaItem, NewMediaItem},
        user::{Credentials, User},
    },
    services::MemoryBackend,
};

pub fn credentials() -> Credentials {
    Credentials {
        email: "ada@example.com".to_string(),
        password: "correct horse".to_string(),
    }
}

pub fn file(name: &str, mime_type: &str) -> FileData {
    FileData::new(
        name.as_bytes().to_vec(),
        name.to_string(),
        Some(mime_type.to_string()),
    )
}

pub async fn signed_in() -> (Arc<MemoryBackend>, Arc<SessionProvider>, User) {
    let backend = Arc::new(MemoryBackend::new("http://localhost", "media"));
    let session = Arc::new(SessionProvider::new(backend.clone()));
    session.initialize().await;
    let user = session.sign_up(&credentials()).await.unwrap();
    (backend, session, user)
}

/// Identity backend that is always unreachable.
pub struct FailingIdentity;

#[async_trait]
impl IdentityService for FailingIdentity {
    async fn current_user(&self) -> Result<Option<User>, ApplicationError> {
        Err(ApplicationError::UnknownFailure("connection refused".into()))
    }

    async fn sign_in(&self, _: &Credentials) -> Result<User, ApplicationError> {
        Err(ApplicationError::UnknownFailure("connection refused".into()))
    }

    async fn sign_up(&self, _: &Credentials) -> Result<User, ApplicationError> {
        Err(ApplicationError::UnknownFailure("connection refused".into()))
    }

    async fn sign_out(&self) -> Result<(), ApplicationError> {
        Err(ApplicationError::UnknownFailure("connection refused".into()))
    }

    fn on_auth_state_change(&self) -> watch::Receiver<Option<User>> {
        watch::channel(None).1
    }
}

/// Storage that rejects uploads of one file name, or every removal.
pub struct FailingStorage {
    inner: Arc<MemoryBackend>,
    upload_of: Option<String>,
    remove: bool,
}

impl FailingStorage {
    pub fn failing_upload_of(inner: Arc<MemoryBackend>, filename: &str) -> Self {
        Self {
            inner,
            upload_of: Some(filename.to_string()),
            remove: false,
        }
    }

    pub fn failing_remove(inner: Arc<MemoryBackend>) -> Self {
        Self {
            inner,
            upload_of: None,
            remove: true,
        }
    }
}

#[async_trait]
impl StorageService for FailingStorage {
    async fn upload(&self, key: &str, file_data: &FileData) -> Result<(), ApplicationError> {
        if self.upload_of.as_deref() == Some(file_data.filename.as_str()) {
            return Err(ApplicationError::StorageFailure(
                "The object exceeded the maximum allowed size".into(),
            ));
        }
        self.inner.upload(key, file_data).await
    }

    fn public_url(&self, key: &str) -> String {
        self.inner.public_url(key)
    }

    async fn remove(&self, keys: &[String]) -> Result<(), ApplicationError> {
        if self.remove {
            return Err(ApplicationError::StorageFailure("storage unavailable".into()));
        }
        self.inner.remove(keys).await
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Failing {
    Insert,
    List,
    Delete,
}

/// Metadata store with one operation switched to fail.
pub struct FailingMetadata {
    inner: Arc<MemoryBackend>,
    operation: Failing,
    failing: AtomicBool,
}

impl FailingMetadata {
    fn new(inner: Arc<MemoryBackend>, operation: Failing) -> Self {
        Self {
            inner,
            operation,
            failing: AtomicBool::new(true),
        }
    }

    pub fn failing_insert(inner: Arc<MemoryBackend>) -> Self {
        Self::new(inner, Failing::Insert)
    }

    pub fn failing_list(inner: Arc<MemoryBackend>) -> Self {
        Self::new(inner, Failing::List)
    }

    pub fn failing_delete(inner: Arc<MemoryBackend>) -> Self {
        Self::new(inner, Failing::Delete)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn fails(&self, operation: Failing) -> Result<(), ApplicationError> {
        if self.operation == operation && self.failing.load(Ordering::SeqCst) {
            return Err(ApplicationError::MetadataFailure(
                "new row violates row-level security policy".into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl MetadataRepository for FailingMetadata {
    async fn insert(&self, record: NewMediaItem) -> Result<MediaItem, ApplicationError> {
        self.fails(Failing::Insert)?;
        self.inner.insert(record).await
    }

    async fn list(
        &self,
        owner: Uuid,
        direction: SortDirection,
    ) -> Result<Vec<MediaItem>, ApplicationError> {
        self.fails(Failing::List)?;
        self.inner.list(owner, direction).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApplicationError> {
        self.fails(Failing::Delete)?;
        self.inner.delete(id).await
    }
}

/// Metadata store whose list responses can be held back after the rows were read.
pub struct GatedMetadata {
    inner: Arc<MemoryBackend>,
    gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
}

impl GatedMetadata {
    pub fn new(inner: Arc<MemoryBackend>) -> Self {
        Self {
            inner,
            gates: Mutex::new(VecDeque::new()),
        }
    }

    /// The next list call waits until the returned sender fires.
    pub fn push_gate(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn pending_gates(&self) -> usize {
        self.gates.lock().unwrap().len()
    }
}

#[async_trait]
impl MetadataRepository for GatedMetadata {
    async fn insert(&self, record: NewMediaItem) -> Result<MediaItem, ApplicationError> {
        self.inner.insert(record).await
    }

    async fn list(
        &self,
        owner: Uuid,
        direction: SortDirection,
    ) -> Result<Vec<MediaItem>, ApplicationError> {
        let rows = self.inner.list(owner, direction).await?;
        let gate = self.gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(rows)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApplicationError> {
        self.inner.delete(id).await
    }
}
