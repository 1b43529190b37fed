use async_trait::async_trait;
use reqwest::{multipart, Method};
use tracing::info;

use crate::{
    application::{error::ApplicationError, services::StorageService},
    domain::models::file::FileData,
    services::{error::BackendError, supabase_client::SupabaseClient},
};

pub struct SupabaseStorageService {
    client: SupabaseClient,
    bucket_name: String,
}

impl SupabaseStorageService {
    pub fn new(client: SupabaseClient, bucket_name: String) -> Self {
        Self {
            client,
            bucket_name,
        }
    }
}

#[async_trait]
impl StorageService for SupabaseStorageService {
    async fn upload(&self, key: &str, file_data: &FileData) -> Result<(), ApplicationError> {
        let file_part = multipart::Part::bytes(file_data.content.clone())
            .file_name(file_data.filename.clone())
            .mime_str(&file_data.mime_type)
            .map_err(|e| BackendError::InternalError(e.to_string()).into_storage())?;

        let form = multipart::Form::new()
            .text("cacheControl", "3600")
            .part("", file_part);

        let path = format!("/storage/v1/object/{}/{}", self.bucket_name, key);

        let response = self
            .client
            .request(Method::POST, &path)
            .multipart(form)
            .send()
            .await
            .map_err(|e| BackendError::from(e).into_storage())?;

        SupabaseClient::check(response)
            .await
            .map_err(BackendError::into_storage)?;

        info!("Stored object {} ({} bytes)", key, file_data.size());
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.client.base_url(),
            self.bucket_name,
            key
        )
    }

    async fn remove(&self, keys: &[String]) -> Result<(), ApplicationError> {
        let path = format!("/storage/v1/object/{}", self.bucket_name);

        let response = self
            .client
            .request(Method::DELETE, &path)
            .json(&serde_json::json!({ "prefixes": keys }))
            .send()
            .await
            .map_err(|e| BackendError::from(e).into_storage())?;

        SupabaseClient::check(response)
            .await
            .map_err(BackendError::into_storage)?;

        info!("Removed objects {:?}", keys);
        Ok(())
    }
}
