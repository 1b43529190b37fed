use thiserror::Error;

use crate::application::error::ApplicationError;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl BackendError {
    pub fn into_storage(self) -> ApplicationError {
        match self {
            BackendError::Unauthorized(msg) => ApplicationError::AuthFailure(msg),
            other => ApplicationError::StorageFailure(other.to_string()),
        }
    }

    pub fn into_metadata(self) -> ApplicationError {
        match self {
            BackendError::Unauthorized(msg) => ApplicationError::AuthFailure(msg),
            other => ApplicationError::MetadataFailure(other.to_string()),
        }
    }

    pub fn into_identity(self) -> ApplicationError {
        match self {
            BackendError::Unauthorized(msg) | BackendError::ProviderError(msg) => {
                ApplicationError::AuthFailure(msg)
            }
            other => ApplicationError::UnknownFailure(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            BackendError::NetworkError("Request timeout".to_string())
        } else if error.is_connect() {
            BackendError::NetworkError(format!("Connection failed: {}", error))
        } else if let Some(status) = error.status() {
            match status.as_u16() {
                404 => BackendError::NotFound(error.to_string()),
                401 | 403 => BackendError::Unauthorized(error.to_string()),
                _ => BackendError::ProviderError(error.to_string()),
            }
        } else {
            BackendError::InternalError(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_into_the_failing_concern() {
        let err = BackendError::ProviderError("quota exceeded".into()).into_storage();
        assert_eq!(
            err,
            ApplicationError::StorageFailure("Provider error: quota exceeded".into())
        );

        let err = BackendError::NotFound("row".into()).into_metadata();
        assert_eq!(err, ApplicationError::MetadataFailure("Not found: row".into()));

        let err = BackendError::Unauthorized("jwt expired".into()).into_metadata();
        assert_eq!(err, ApplicationError::AuthFailure("jwt expired".into()));

        let err = BackendError::ProviderError("Invalid login credentials".into()).into_identity();
        assert_eq!(err.to_string(), "Invalid login credentials");
    }
}
