use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::{
    application::{
        components::{
            events::{EventBus, GalleryEvent},
            session::SessionProvider,
        },
        error::ApplicationError,
        repositories::metadata_repository::{MetadataRepository, SortDirection},
        services::StorageService,
    },
    domain::models::media::MediaItem,
};

pub const CONFIRM_DELETE: &str = "Are you sure you want to delete this item?";
pub const DELETE_FAILED: &str = "Failed to delete media";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryView {
    Loading,
    Loaded,
    Empty,
    Viewing(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Escape" => Key::Escape,
            _ => Key::Other,
        }
    }
}

/// Asked before anything is deleted.
pub trait ConfirmPrompt: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> ConfirmPrompt for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted(MediaItem),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryEntry {
    pub item: MediaItem,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GallerySnapshot {
    pub view: GalleryView,
    pub items: Vec<GalleryEntry>,
    pub selected: Option<GalleryEntry>,
    pub has_previous: bool,
    pub has_next: bool,
    pub deleting: bool,
    pub alert: Option<String>,
}

struct GalleryState {
    view: GalleryView,
    items: Vec<MediaItem>,
    generation: u64,
    deleting: bool,
    alert: Option<String>,
}

/// Grid plus lightbox over the signed-in user's media, newest first.
pub struct Gallery {
    session: Arc<SessionProvider>,
    storage: Arc<dyn StorageService>,
    metadata: Arc<dyn MetadataRepository>,
    events: EventBus,
    transitions: broadcast::Sender<GalleryView>,
    state: Mutex<GalleryState>,
}

impl Gallery {
    pub fn new(
        session: Arc<SessionProvider>,
        storage: Arc<dyn StorageService>,
        metadata: Arc<dyn MetadataRepository>,
        events: EventBus,
    ) -> Self {
        let (transitions, _) = broadcast::channel(64);
        Self {
            session,
            storage,
            metadata,
            events,
            transitions,
            state: Mutex::new(GalleryState {
                view: GalleryView::Loading,
                items: Vec::new(),
                generation: 0,
                deleting: false,
                alert: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GalleryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_view(&self, state: &mut GalleryState, view: GalleryView) {
        state.view = view;
        let _ = self.transitions.send(view);
    }

    fn settled_view(state: &GalleryState) -> GalleryView {
        if state.items.is_empty() {
            GalleryView::Empty
        } else {
            GalleryView::Loaded
        }
    }

    pub fn view(&self) -> GalleryView {
        self.lock().view
    }

    /// Every view change, in order.
    pub fn transitions(&self) -> broadcast::Receiver<GalleryView> {
        self.transitions.subscribe()
    }

    pub fn items(&self) -> Vec<MediaItem> {
        self.lock().items.clone()
    }

    pub fn public_url(&self, item: &MediaItem) -> String {
        self.storage.public_url(&item.file_path)
    }

    pub fn snapshot(&self) -> GallerySnapshot {
        let state = self.lock();
        let entry = |item: &MediaItem| GalleryEntry {
            item: item.clone(),
            url: self.public_url(item),
        };

        let (selected, has_previous, has_next) = match state.view {
            GalleryView::Viewing(index) => (
                state.items.get(index).map(entry),
                index > 0,
                index + 1 < state.items.len(),
            ),
            _ => (None, false, false),
        };

        GallerySnapshot {
            view: state.view,
            items: state.items.iter().map(entry).collect(),
            selected,
            has_previous,
            has_next,
            deleting: state.deleting,
            alert: state.alert.clone(),
        }
    }

    /// Re-runs the list query from any state.
    ///
    /// A response that arrives after a newer refresh started is dropped. A
    /// failed query keeps the previous list.
    pub async fn refresh(&self) {
        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            self.set_view(&mut state, GalleryView::Loading);
            state.generation
        };

        let result = match self.session.current_user() {
            Some(user) => self.metadata.list(user.id, SortDirection::Descending).await,
            None => Ok(Vec::new()),
        };

        let mut state = self.lock();
        if state.generation != generation {
            debug!("Discarding stale gallery load {}", generation);
            return;
        }

        match result {
            Ok(items) => state.items = items,
            Err(e) => error!("Error loading media: {}", e),
        }

        let view = Self::settled_view(&state);
        self.set_view(&mut state, view);
    }

    pub fn open(&self, index: usize) -> Result<GalleryView, ApplicationError> {
        let mut state = self.lock();
        match state.view {
            GalleryView::Loaded | GalleryView::Viewing(_) => {}
            GalleryView::Loading => {
                return Err(ApplicationError::BadRequest(
                    "Gallery is still loading".to_string(),
                ))
            }
            GalleryView::Empty => {
                return Err(ApplicationError::NotFound(format!("No item at index {}", index)))
            }
        }

        if index >= state.items.len() {
            return Err(ApplicationError::NotFound(format!("No item at index {}", index)));
        }

        self.set_view(&mut state, GalleryView::Viewing(index));
        Ok(state.view)
    }

    pub fn next(&self) -> GalleryView {
        let mut state = self.lock();
        if let GalleryView::Viewing(index) = state.view {
            if index + 1 < state.items.len() {
                self.set_view(&mut state, GalleryView::Viewing(index + 1));
            }
        }
        state.view
    }

    pub fn previous(&self) -> GalleryView {
        let mut state = self.lock();
        if let GalleryView::Viewing(index) = state.view {
            if index > 0 {
                self.set_view(&mut state, GalleryView::Viewing(index - 1));
            }
        }
        state.view
    }

    /// Close button and outside click.
    pub fn close(&self) -> GalleryView {
        let mut state = self.lock();
        if let GalleryView::Viewing(_) = state.view {
            let view = Self::settled_view(&state);
            self.set_view(&mut state, view);
        }
        state.view
    }

    pub fn handle_key(&self, key: Key) -> GalleryView {
        if !matches!(self.view(), GalleryView::Viewing(_)) {
            return self.view();
        }

        match key {
            Key::ArrowLeft => self.previous(),
            Key::ArrowRight => self.next(),
            Key::Escape => self.close(),
            Key::Other => self.view(),
        }
    }

    pub fn download_url(&self) -> Result<String, ApplicationError> {
        let state = self.lock();
        match state.view {
            GalleryView::Viewing(index) => state
                .items
                .get(index)
                .map(|item| self.public_url(item))
                .ok_or_else(|| ApplicationError::NotFound(format!("No item at index {}", index))),
            _ => Err(ApplicationError::BadRequest("No item is open".to_string())),
        }
    }

    pub fn dismiss_alert(&self) {
        self.lock().alert = None;
    }

    pub async fn delete_selected(
        &self,
        prompt: &dyn ConfirmPrompt,
    ) -> Result<DeleteOutcome, ApplicationError> {
        let id = {
            let state = self.lock();
            match state.view {
                GalleryView::Viewing(index) => state.items.get(index).map(|item| item.id),
                _ => None,
            }
        }
        .ok_or_else(|| ApplicationError::BadRequest("No item is open".to_string()))?;

        self.delete(id, prompt).await
    }

    /// Removes the storage object, then the metadata row.
    ///
    /// Either failure leaves the list and view as they were and records the
    /// alert. On success the lightbox closes and `DeleteCompleted` is published.
    pub async fn delete(
        &self,
        id: Uuid,
        prompt: &dyn ConfirmPrompt,
    ) -> Result<DeleteOutcome, ApplicationError> {
        let item = {
            let mut state = self.lock();
            if state.deleting {
                return Err(ApplicationError::BadRequest(
                    "A delete is already in progress".to_string(),
                ));
            }
            let item = match state.items.iter().find(|item| item.id == id) {
                Some(item) => item.clone(),
                None => {
                    let err = ApplicationError::NotFound(format!("Media {} not found", id));
                    error!("Error deleting media: {}", err);
                    state.alert = Some(DELETE_FAILED.to_string());
                    return Err(err);
                }
            };
            // Claimed before the prompt so a concurrent delete sees it.
            state.deleting = true;
            item
        };

        if !prompt.confirm(CONFIRM_DELETE) {
            self.lock().deleting = false;
            return Ok(DeleteOutcome::Cancelled);
        }

        let result = match self.storage.remove(&[item.file_path.clone()]).await {
            Ok(()) => self.metadata.delete(item.id).await,
            Err(e) => Err(e),
        };

        let mut state = self.lock();
        state.deleting = false;

        match result {
            Ok(()) => {
                if let GalleryView::Viewing(_) = state.view {
                    let view = Self::settled_view(&state);
                    self.set_view(&mut state, view);
                }
                state.alert = None;
                drop(state);

                info!("Deleted media {} ({})", item.id, item.file_path);
                self.events.publish(GalleryEvent::DeleteCompleted { id: item.id });
                Ok(DeleteOutcome::Deleted(item))
            }
            Err(e) => {
                error!("Error deleting media {}: {}", item.id, e);
                state.alert = Some(DELETE_FAILED.to_string());
                Err(e)
            }
        }
    }
}
