use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// `video/*` is a video, anything else is treated as an image.
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }

    pub fn is_image(self) -> bool {
        self == MediaKind::Image
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_path: String,
    pub file_type: MediaKind,
    pub file_size: u64,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
}

/// Insert shape of a media row; `id` and `created_at` are assigned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMediaItem {
    pub title: String,
    pub description: Option<String>,
    pub file_path: String,
    pub file_type: MediaKind,
    pub file_size: u64,
    pub thumbnail_url: Option<String>,
    pub user_id: Uuid,
}

impl NewMediaItem {
    pub fn into_item(self, id: Uuid, created_at: DateTime<Utc>) -> MediaItem {
        MediaItem {
            id,
            title: self.title,
            description: self.description,
            file_path: self.file_path,
            file_type: self.file_type,
            file_size: self.file_size,
            thumbnail_url: self.thumbnail_url,
            created_at,
            user_id: self.user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_mime_prefix() {
        assert_eq!(MediaKind::from_mime("video/quicktime"), MediaKind::Video);
        assert_eq!(MediaKind::from_mime("video/mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_mime("image/jpeg"), MediaKind::Image);
        assert_eq!(MediaKind::from_mime(""), MediaKind::Image);
        assert_eq!(MediaKind::from_mime("application/pdf"), MediaKind::Image);
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MediaKind::Video).unwrap(), "\"video\"");
        let kind: MediaKind = serde_json::from_str("\"image\"").unwrap();
        assert_eq!(kind, MediaKind::Image);
    }
}
