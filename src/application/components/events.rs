use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// "Data changed" notifications the shell turns into gallery reloads.
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryEvent {
    UploadCompleted { count: usize },
    DeleteCompleted { id: Uuid },
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<GalleryEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: GalleryEvent) {
        if self.sender.send(event.clone()).is_err() {
            debug!("No listener for {:?}", event);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GalleryEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
