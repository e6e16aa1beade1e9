//! Errors returned by the hierarchy and auth managers

use thiserror::Error;

use crate::models::ResourceKind;
use crate::storage::StorageError;

/// Failure of a single operation.
///
/// Every variant is terminal for the call that produced it; nothing here is
/// fatal to the process.
#[derive(Error, Debug)]
pub enum KanboardError {
    /// A required argument was missing or empty
    #[error("{0}")]
    InvalidArgument(String),

    /// The target record, or the parent named by the caller, does not exist
    #[error("{kind} does not exist: {id}")]
    NotFound { kind: ResourceKind, id: String },

    /// No account matches the credentials
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// The document store could not be read or written
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),
}

impl KanboardError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        KanboardError::InvalidArgument(message.into())
    }

    pub fn not_found(kind: ResourceKind, id: impl Into<String>) -> Self {
        KanboardError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Machine-readable code surfaced to API clients
    pub fn code(&self) -> &'static str {
        match self {
            KanboardError::InvalidArgument(_) => "BAD_USER_INPUT",
            KanboardError::NotFound { .. } => "NOT_FOUND",
            KanboardError::AuthenticationFailed => "UNAUTHENTICATED",
            KanboardError::StorageUnavailable(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, KanboardError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::IoStage;
    use std::io;

    #[test]
    fn test_codes() {
        assert_eq!(
            KanboardError::invalid_argument("No userId in request").code(),
            "BAD_USER_INPUT"
        );
        assert_eq!(
            KanboardError::not_found(ResourceKind::Board, "b1").code(),
            "NOT_FOUND"
        );
        assert_eq!(KanboardError::AuthenticationFailed.code(), "UNAUTHENTICATED");
    }

    #[test]
    fn test_not_found_display() {
        let err = KanboardError::not_found(ResourceKind::List, "l-42");
        assert_eq!(err.to_string(), "List does not exist: l-42");
    }

    #[test]
    fn test_storage_error_is_wrapped() {
        let source = io::Error::new(io::ErrorKind::Other, "device busy");
        let err: KanboardError = StorageError::io(IoStage::Replace, "/data/db.json", source).into();

        assert_eq!(err.code(), "INTERNAL_SERVER_ERROR");
        assert!(err.to_string().contains("/data/db.json"));
    }

    #[test]
    fn test_authentication_message_is_generic() {
        assert_eq!(
            KanboardError::AuthenticationFailed.to_string(),
            "Authentication failed"
        );
    }
}
