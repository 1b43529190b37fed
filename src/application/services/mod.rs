mod identity_service;
mod storage_service;

pub use identity_service::IdentityService;
pub use storage_service::StorageService;
