//! Document error types.

use thiserror::Error;
use uuid::Uuid;

use crate::links::LinkError;
use crate::storage::StorageError;

/// Document operation errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Document not found.
    #[error("document not found: {0}")]
    NotFound(Uuid),

    /// Linked client not found in the agency.
    #[error("client not found: {0}")]
    ClientNotFound(Uuid),

    /// Linked policy not found in the agency.
    #[error("policy not found: {0}")]
    PolicyNotFound(Uuid),

    /// Client and policy links disagree.
    #[error(transparent)]
    Link(#[from] LinkError),

    /// The recorded path is not one this agency may use.
    #[error("file path is outside the agency's storage prefix: {0}")]
    PathOutsideAgency(String),

    /// A document record already points at this path.
    #[error("a document is already registered at {0}")]
    DuplicatePath(String),

    /// No storage backend is configured.
    #[error("document storage is not configured")]
    StorageNotConfigured,

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl DocumentError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}
