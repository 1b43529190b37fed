use thiserror::Error;

/// Failures surfaced to the user. The message is what the banner or alert shows.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApplicationError {
    #[error("You must be logged in to upload files")]
    NotAuthenticated,

    #[error("{0}")]
    AuthFailure(String),

    #[error("{0}")]
    StorageFailure(String),

    #[error("{0}")]
    MetadataFailure(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    UnknownFailure(String),
}
