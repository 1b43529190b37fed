use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    application::components::{
        gallery::{GalleryEntry, GallerySnapshot, GalleryView},
        upload::UploadState,
    },
    domain::models::media::{MediaItem, MediaKind},
};

#[derive(Debug, Serialize)]
pub struct MediaResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "fileType")]
    pub file_type: MediaKind,
    #[serde(rename = "fileSize")]
    pub file_size: u64,
    #[serde(rename = "thumbnailUrl")]
    pub thumbnail_url: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<MediaItem> for MediaResponse {
    fn from(item: MediaItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            description: item.description,
            file_path: item.file_path,
            file_type: item.file_type,
            file_size: item.file_size,
            thumbnail_url: item.thumbnail_url,
            created_at: item.created_at,
            user_id: item.user_id,
            url: None,
        }
    }
}

impl From<GalleryEntry> for MediaResponse {
    fn from(entry: GalleryEntry) -> Self {
        Self {
            url: Some(entry.url),
            ..MediaResponse::from(entry.item)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub items: Vec<MediaResponse>,
}

#[derive(Debug, Serialize)]
pub struct UploadStateResponse {
    #[serde(rename = "isDragging")]
    pub is_dragging: bool,
    pub uploading: bool,
    pub error: Option<String>,
    pub selection: Vec<String>,
}

impl From<UploadState> for UploadStateResponse {
    fn from(state: UploadState) -> Self {
        Self {
            is_dragging: state.is_dragging,
            uploading: state.uploading,
            error: state.error,
            selection: state.selection,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragEvent {
    Over,
    Leave,
    Drop,
}

#[derive(Debug, Deserialize)]
pub struct DragRequest {
    pub event: DragEvent,
}

#[derive(Debug, Deserialize)]
pub struct KeyRequest {
    pub key: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    pub confirm: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct GalleryResponse {
    pub state: &'static str,
    #[serde(rename = "selectedIndex")]
    pub selected_index: Option<usize>,
    pub items: Vec<MediaResponse>,
    pub selected: Option<MediaResponse>,
    #[serde(rename = "hasPrevious")]
    pub has_previous: bool,
    #[serde(rename = "hasNext")]
    pub has_next: bool,
    pub deleting: bool,
    pub alert: Option<String>,
}

impl From<GallerySnapshot> for GalleryResponse {
    fn from(snapshot: GallerySnapshot) -> Self {
        let (state, selected_index) = match snapshot.view {
            GalleryView::Loading => ("loading", None),
            GalleryView::Loaded => ("loaded", None),
            GalleryView::Empty => ("empty", None),
            GalleryView::Viewing(index) => ("viewing", Some(index)),
        };

        Self {
            state,
            selected_index,
            items: snapshot.items.into_iter().map(MediaResponse::from).collect(),
            selected: snapshot.selected.map(MediaResponse::from),
            has_previous: snapshot.has_previous,
            has_next: snapshot.has_next,
            deleting: snapshot.deleting,
            alert: snapshot.alert,
        }
    }
}
