use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    application::error::ApplicationError,
    domain::models::media::{MediaItem, NewMediaItem},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[async_trait]
pub trait MetadataRepository: Send + Sync {
    async fn insert(&self, record: NewMediaItem) -> Result<MediaItem, ApplicationError>;
    /// Rows owned by `owner`, ordered by `created_at`.
    async fn list(
        &self,
        owner: Uuid,
        direction: SortDirection,
    ) -> Result<Vec<MediaItem>, ApplicationError>;
    async fn delete(&self, id: Uuid) -> Result<(), ApplicationError>;
}
