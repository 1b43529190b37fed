use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    application::{
        error::ApplicationError,
        repositories::metadata_repository::{MetadataRepository, SortDirection},
    },
    domain::models::media::{MediaItem, MediaKind, NewMediaItem},
    services::{error::BackendError, supabase_client::SupabaseClient},
};

/// Row as PostgREST returns it; `file_size` is a bigint that may come back null.
#[derive(Debug, Deserialize)]
struct MediaRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    file_path: String,
    file_type: String,
    file_size: Option<i64>,
    thumbnail_url: Option<String>,
    created_at: DateTime<Utc>,
    user_id: Uuid,
}

impl From<MediaRow> for MediaItem {
    fn from(row: MediaRow) -> Self {
        MediaItem {
            id: row.id,
            title: row.title,
            description: row.description,
            file_path: row.file_path,
            file_type: if row.file_type == "video" {
                MediaKind::Video
            } else {
                MediaKind::Image
            },
            file_size: row.file_size.unwrap_or(0).max(0) as u64,
            thumbnail_url: row.thumbnail_url,
            created_at: row.created_at,
            user_id: row.user_id,
        }
    }
}

#[derive(Debug, Serialize)]
struct InsertRow<'a> {
    title: &'a str,
    description: Option<&'a str>,
    file_path: &'a str,
    file_type: &'a str,
    file_size: i64,
    thumbnail_url: Option<&'a str>,
    user_id: Uuid,
}

impl<'a> From<&'a NewMediaItem> for InsertRow<'a> {
    fn from(record: &'a NewMediaItem) -> Self {
        InsertRow {
            title: &record.title,
            description: record.description.as_deref(),
            file_path: &record.file_path,
            file_type: record.file_type.as_str(),
            file_size: std::cmp::min(record.file_size, i64::MAX as u64) as i64,
            thumbnail_url: record.thumbnail_url.as_deref(),
            user_id: record.user_id,
        }
    }
}

pub struct SupabaseMetadataRepository {
    client: SupabaseClient,
    table_name: String,
}

impl SupabaseMetadataRepository {
    pub fn new(client: SupabaseClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    fn list_path(&self, owner: Uuid, direction: SortDirection) -> String {
        let order = match direction {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        };
        format!(
            "/rest/v1/{}?select=*&user_id=eq.{}&order=created_at.{}",
            self.table_name, owner, order
        )
    }
}

#[async_trait]
impl MetadataRepository for SupabaseMetadataRepository {
    async fn insert(&self, record: NewMediaItem) -> Result<MediaItem, ApplicationError> {
        let path = format!("/rest/v1/{}", self.table_name);

        let response = self
            .client
            .request(Method::POST, &path)
            .header("Prefer", "return=representation")
            .json(&InsertRow::from(&record))
            .send()
            .await
            .map_err(|e| BackendError::from(e).into_metadata())?;

        let response = SupabaseClient::check(response)
            .await
            .map_err(BackendError::into_metadata)?;

        let rows: Vec<MediaRow> = response
            .json()
            .await
            .map_err(|e| BackendError::from(e).into_metadata())?;

        rows.into_iter().next().map(MediaItem::from).ok_or_else(|| {
            ApplicationError::MetadataFailure("Insert returned no row".to_string())
        })
    }

    async fn list(
        &self,
        owner: Uuid,
        direction: SortDirection,
    ) -> Result<Vec<MediaItem>, ApplicationError> {
        let response = self
            .client
            .request(Method::GET, &self.list_path(owner, direction))
            .send()
            .await
            .map_err(|e| BackendError::from(e).into_metadata())?;

        let response = SupabaseClient::check(response)
            .await
            .map_err(BackendError::into_metadata)?;

        let rows: Vec<MediaRow> = response
            .json()
            .await
            .map_err(|e| BackendError::from(e).into_metadata())?;

        Ok(rows.into_iter().map(MediaItem::from).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApplicationError> {
        let path = format!("/rest/v1/{}?id=eq.{}", self.table_name, id);

        let response = self
            .client
            .request(Method::DELETE, &path)
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(|e| BackendError::from(e).into_metadata())?;

        let response = SupabaseClient::check(response)
            .await
            .map_err(BackendError::into_metadata)?;

        let rows: Vec<MediaRow> = response
            .json()
            .await
            .map_err(|e| BackendError::from(e).into_metadata())?;

        if rows.is_empty() {
            return Err(BackendError::NotFound(format!("media {}", id)).into_metadata());
        }

        Ok(())
    }
}
