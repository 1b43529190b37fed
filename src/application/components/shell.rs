use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use tokio::{sync::broadcast::error::RecvError, task::JoinHandle};
use tracing::{info, warn};

use crate::{
    application::components::{
        events::{EventBus, GalleryEvent},
        gallery::{Gallery, GallerySnapshot},
        session::SessionProvider,
        upload::{UploadState, Uploader},
    },
    domain::models::user::User,
    services::Backend,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ShellView {
    Loading,
    SignedOut,
    Ready {
        user: User,
        show_upload: bool,
        refresh: u64,
        upload: UploadState,
        gallery: GallerySnapshot,
    },
}

/// Composes session, upload and gallery, and turns "data changed" events into reloads.
pub struct AppShell {
    session: Arc<SessionProvider>,
    uploader: Arc<Uploader>,
    gallery: Arc<Gallery>,
    events: EventBus,
    show_upload: AtomicBool,
    refresh: AtomicU64,
}

impl AppShell {
    pub fn new(backend: Backend) -> Arc<Self> {
        let events = EventBus::default();
        let session = Arc::new(SessionProvider::new(backend.identity));
        let uploader = Arc::new(Uploader::new(
            session.clone(),
            backend.storage.clone(),
            backend.metadata.clone(),
            events.clone(),
        ));
        let gallery = Arc::new(Gallery::new(
            session.clone(),
            backend.storage,
            backend.metadata,
            events.clone(),
        ));

        Arc::new(Self {
            session,
            uploader,
            gallery,
            events,
            show_upload: AtomicBool::new(false),
            refresh: AtomicU64::new(0),
        })
    }

    pub fn session(&self) -> &Arc<SessionProvider> {
        &self.session
    }

    pub fn uploader(&self) -> &Arc<Uploader> {
        &self.uploader
    }

    pub fn gallery(&self) -> &Arc<Gallery> {
        &self.gallery
    }

    /// Resolves the session, loads the gallery and spawns the event and session listeners.
    pub async fn start(self: &Arc<Self>) -> Vec<JoinHandle<()>> {
        self.session.initialize().await;
        self.gallery.refresh().await;

        vec![
            self.session.listen(),
            self.spawn_event_loop(),
            self.spawn_session_watch(),
        ]
    }

    fn spawn_event_loop(self: &Arc<Self>) -> JoinHandle<()> {
        let shell = Arc::clone(self);
        let mut events = self.events.subscribe();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => shell.handle_event(event).await,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Skipped {} gallery events, reloading", skipped);
                        shell.bump_refresh();
                        shell.gallery.refresh().await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    fn spawn_session_watch(self: &Arc<Self>) -> JoinHandle<()> {
        let shell = Arc::clone(self);
        let mut changes = self.session.subscribe();
        changes.borrow_and_update();

        tokio::spawn(async move {
            let mut signed_in = changes.borrow().current_user.as_ref().map(|u| u.id);
            while changes.changed().await.is_ok() {
                let now = changes.borrow_and_update().current_user.as_ref().map(|u| u.id);
                if now != signed_in {
                    signed_in = now;
                    if now.is_none() {
                        shell.show_upload.store(false, Ordering::SeqCst);
                    }
                    shell.bump_refresh();
                    shell.gallery.refresh().await;
                }
            }
        })
    }

    fn bump_refresh(&self) -> u64 {
        self.refresh.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub async fn handle_event(&self, event: GalleryEvent) {
        if let GalleryEvent::UploadCompleted { .. } = event {
            self.show_upload.store(false, Ordering::SeqCst);
        }

        let refresh = self.bump_refresh();
        info!("Reloading gallery after {:?} (refresh {})", event, refresh);
        self.gallery.refresh().await;
    }

    pub fn toggle_upload(&self) -> bool {
        !self.show_upload.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn view(&self) -> ShellView {
        let session = self.session.snapshot();
        if session.is_loading {
            return ShellView::Loading;
        }

        match session.current_user {
            None => ShellView::SignedOut,
            Some(user) => ShellView::Ready {
                user,
                show_upload: self.show_upload.load(Ordering::SeqCst),
                refresh: self.refresh.load(Ordering::SeqCst),
                upload: self.uploader.snapshot(),
                gallery: self.gallery.snapshot(),
            },
        }
    }
}
