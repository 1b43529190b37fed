mod error;
mod memory;
mod supabase_auth;
mod supabase_client;
mod supabase_metadata;
mod supabase_storage;

pub use error::BackendError;
pub use memory::MemoryBackend;
pub use supabase_auth::SupabaseAuthService;
pub use supabase_client::SupabaseClient;
pub use supabase_metadata::SupabaseMetadataRepository;
pub use supabase_storage::SupabaseStorageService;

use std::sync::Arc;

use crate::{
    application::{
        repositories::metadata_repository::MetadataRepository,
        services::{IdentityService, StorageService},
    },
    domain::config::gallery::{GalleryConfig, Provider},
};

/// The three collaborators the gallery talks to, plus the memory backend when it is in use.
#[derive(Clone)]
pub struct Backend {
    pub identity: Arc<dyn IdentityService>,
    pub storage: Arc<dyn StorageService>,
    pub metadata: Arc<dyn MetadataRepository>,
    pub memory: Option<Arc<MemoryBackend>>,
}

impl Backend {
    pub fn memory(backend: Arc<MemoryBackend>) -> Self {
        Self {
            identity: backend.clone(),
            storage: backend.clone(),
            metadata: backend.clone(),
            memory: Some(backend),
        }
    }
}

pub fn create_backend(config: &GalleryConfig) -> Result<Backend, BackendError> {
    match config.provider {
        Provider::Supabase => {
            let secrets = config.supabase.clone().ok_or_else(|| {
                BackendError::InternalError("Supabase secrets not found".to_string())
            })?;

            let client = SupabaseClient::new(secrets);
            Ok(Backend {
                identity: Arc::new(SupabaseAuthService::new(client.clone())),
                storage: Arc::new(SupabaseStorageService::new(
                    client.clone(),
                    config.bucket_name.clone(),
                )),
                metadata: Arc::new(SupabaseMetadataRepository::new(
                    client,
                    config.table_name.clone(),
                )),
                memory: None,
            })
        }
        Provider::Memory => {
            let public_base = format!("http://localhost:{}", config.port);
            Ok(Backend::memory(Arc::new(MemoryBackend::new(
                &public_base,
                &config.bucket_name,
            ))))
        }
    }
}
