//! Documents: stored files linked to clients and policies.
//!
//! This module provides business logic for documents including:
//! - Signed upload URL generation with agency-scoped object paths
//! - Record creation after upload
//! - Signed download URLs
//! - Deletion of the object and the record

mod error;
mod service;
mod types;

pub use error::DocumentError;
pub use service::{DeletedDocument, DocumentRepository, DocumentService};
pub use types::{
    Document, DocumentOwner, NewDocument, RequestUploadInput, UploadTicket, is_agency_path,
    object_path,
};
