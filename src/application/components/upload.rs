use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::{
        components::{
            events::{EventBus, GalleryEvent},
            session::SessionProvider,
        },
        error::ApplicationError,
        repositories::metadata_repository::MetadataRepository,
        services::StorageService,
    },
    domain::models::{
        file::FileData,
        media::{MediaItem, MediaKind, NewMediaItem},
    },
};

const TOKEN_LEN: usize = 6;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadState {
    pub is_dragging: bool,
    pub uploading: bool,
    /// Banner text of the last failed batch.
    pub error: Option<String>,
    /// Names held by the file input; cleared once a batch fully succeeds.
    pub selection: Vec<String>,
}

/// `{userId}/{epochMillis}-{token}.{ext}`
pub fn storage_key(user_id: Uuid, epoch_millis: i64, token: &str, extension: &str) -> String {
    format!("{}/{}-{}.{}", user_id, epoch_millis, token, extension)
}

fn random_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect()
}

pub struct Uploader {
    session: Arc<SessionProvider>,
    storage: Arc<dyn StorageService>,
    metadata: Arc<dyn MetadataRepository>,
    events: EventBus,
    state: Mutex<UploadState>,
}

impl Uploader {
    pub fn new(
        session: Arc<SessionProvider>,
        storage: Arc<dyn StorageService>,
        metadata: Arc<dyn MetadataRepository>,
        events: EventBus,
    ) -> Self {
        Self {
            session,
            storage,
            metadata,
            events,
            state: Mutex::new(UploadState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, UploadState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> UploadState {
        self.lock().clone()
    }

    pub fn drag_over(&self) {
        self.lock().is_dragging = true;
    }

    pub fn drag_leave(&self) {
        self.lock().is_dragging = false;
    }

    pub fn drop_files(&self) {
        self.lock().is_dragging = false;
    }

    pub fn dismiss_error(&self) {
        self.lock().error = None;
    }

    /// Records a failure that happened before the batch could start, such as
    /// an unreadable request body, in the banner.
    pub fn reject(&self, err: ApplicationError) -> ApplicationError {
        warn!("Upload rejected: {}", err);
        self.lock().error = Some(err.to_string());
        err
    }

    /// Uploads the files one after the other; the first failure stops the batch.
    ///
    /// Files stored before the failure stay in place. On full success the
    /// selection is cleared and one `UploadCompleted` event is published.
    pub async fn submit_files(
        &self,
        files: Vec<FileData>,
    ) -> Result<Vec<MediaItem>, ApplicationError> {
        let Some(user) = self.session.current_user() else {
            let err = ApplicationError::NotAuthenticated;
            warn!("Upload attempted without a session");
            self.lock().error = Some(err.to_string());
            return Err(err);
        };

        {
            let mut state = self.lock();
            if state.uploading {
                return Err(ApplicationError::BadRequest(
                    "An upload is already in progress".to_string(),
                ));
            }
            state.uploading = true;
            state.error = None;
            state.selection = files.iter().map(|f| f.filename.clone()).collect();
        }

        let mut uploaded = Vec::with_capacity(files.len());
        for file in &files {
            match self.upload_one(user.id, file).await {
                Ok(item) => uploaded.push(item),
                Err(e) => {
                    error!("Upload error for {}: {}", file.filename, e);
                    let mut state = self.lock();
                    state.uploading = false;
                    state.error = Some(e.to_string());
                    return Err(e);
                }
            }
        }

        {
            let mut state = self.lock();
            state.uploading = false;
            state.selection.clear();
        }

        info!("Uploaded {} file(s) for {}", uploaded.len(), user.id);
        self.events.publish(GalleryEvent::UploadCompleted {
            count: uploaded.len(),
        });
        Ok(uploaded)
    }

    async fn upload_one(&self, user_id: Uuid, file: &FileData) -> Result<MediaItem, ApplicationError> {
        let file_type = MediaKind::from_mime(&file.mime_type);
        let key = storage_key(
            user_id,
            Utc::now().timestamp_millis(),
            &random_token(),
            &file.extension(),
        );

        self.storage.upload(&key, file).await?;
        let public_url = self.storage.public_url(&key);

        let record = NewMediaItem {
            title: file.filename.clone(),
            description: None,
            file_path: key.clone(),
            file_type,
            file_size: file.size(),
            thumbnail_url: file_type.is_image().then_some(public_url),
            user_id,
        };

        self.metadata.insert(record).await.map_err(|e| {
            warn!("Object {} stored without a metadata row", key);
            e
        })
    }
}
