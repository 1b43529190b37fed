use async_trait::async_trait;

use crate::{application::error::ApplicationError, domain::models::file::FileData};

#[async_trait]
pub trait StorageService: Send + Sync {
    async fn upload(&self, key: &str, file_data: &FileData) -> Result<(), ApplicationError>;
    /// Pure derivation from the key, no network round-trip.
    fn public_url(&self, key: &str) -> String;
    async fn remove(&self, keys: &[String]) -> Result<(), ApplicationError>;
}
