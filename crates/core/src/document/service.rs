//! Document service implementation.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::error::DocumentError;
use super::types::{
    Document, DocumentOwner, NewDocument, RequestUploadInput, UploadTicket, is_agency_path,
    object_path,
};
use crate::links::{PolicyRef, RecordLinks, resolve_links};
use crate::storage::{PresignedUrl, StorageError, StorageService};

/// Repository trait for document persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait DocumentRepository: Send + Sync {
    /// Create a new document record.
    fn create(
        &self,
        agency_id: Uuid,
        input: NewDocument,
    ) -> impl std::future::Future<Output = Result<Document, DocumentError>> + Send;

    /// Find document by ID.
    fn find_by_id(
        &self,
        id: Uuid,
        agency_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Document>, DocumentError>> + Send;

    /// Delete document by ID.
    fn delete(
        &self,
        id: Uuid,
        agency_id: Uuid,
    ) -> impl std::future::Future<Output = Result<bool, DocumentError>> + Send;

    /// Check if a client exists in the agency.
    fn client_exists(
        &self,
        client_id: Uuid,
        agency_id: Uuid,
    ) -> impl std::future::Future<Output = Result<bool, DocumentError>> + Send;

    /// Look up a policy and its owning client.
    fn find_policy(
        &self,
        policy_id: Uuid,
        agency_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<PolicyRef>, DocumentError>> + Send;
}

/// A deleted document and what happened to its stored object.
#[derive(Debug)]
pub struct DeletedDocument {
    /// The removed record.
    pub document: Document,
    /// Set when the object could not be removed from storage.
    pub storage_error: Option<StorageError>,
}

/// Document service for managing stored files.
pub struct DocumentService<R: DocumentRepository> {
    storage: Option<Arc<StorageService>>,
    repo: Arc<R>,
}

impl<R: DocumentRepository> DocumentService<R> {
    /// Create a new document service. Without storage, URL operations fail
    /// with `StorageNotConfigured` and deletes only remove the record.
    #[must_use]
    pub fn new(storage: Option<Arc<StorageService>>, repo: Arc<R>) -> Self {
        Self { storage, repo }
    }

    fn storage(&self) -> Result<&StorageService, DocumentError> {
        self.storage
            .as_deref()
            .ok_or(DocumentError::StorageNotConfigured)
    }

    /// Checks that linked records exist in the agency and agree.
    async fn check_links(
        &self,
        agency_id: Uuid,
        client_id: Option<Uuid>,
        policy_id: Option<Uuid>,
    ) -> Result<RecordLinks, DocumentError> {
        if let Some(client_id) = client_id
            && !self.repo.client_exists(client_id, agency_id).await?
        {
            return Err(DocumentError::ClientNotFound(client_id));
        }

        let policy = match policy_id {
            Some(policy_id) => Some(
                self.repo
                    .find_policy(policy_id, agency_id)
                    .await?
                    .ok_or(DocumentError::PolicyNotFound(policy_id))?,
            ),
            None => None,
        };

        Ok(resolve_links(client_id, policy)?)
    }

    /// Request a signed upload URL for a new document.
    ///
    /// The object is filed under the requested client, else the requested
    /// policy, else the agency's general folder.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Storage is not configured
    /// - A linked client or policy does not exist
    /// - File size or MIME type is rejected
    /// - Presigning fails
    pub async fn request_upload(
        &self,
        input: RequestUploadInput,
    ) -> Result<UploadTicket, DocumentError> {
        let storage = self.storage()?;

        self.check_links(input.agency_id, input.client_id, input.policy_id)
            .await?;

        storage.validate_upload(input.content_type.as_deref(), input.file_size)?;

        let owner = DocumentOwner::from_links(input.client_id, input.policy_id);
        let path = object_path(input.agency_id, owner, Utc::now(), &input.file_name);

        let presigned = storage
            .presign_upload(&path, input.content_type.as_deref())
            .await?;

        Ok(UploadTicket {
            url: presigned.url,
            path,
            method: presigned.method,
            headers: presigned.headers,
            expires_at: presigned.expires_at,
        })
    }

    /// Create the document record for an uploaded file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path is outside the agency prefix
    /// - A linked client or policy does not exist or they disagree
    /// - Database operation fails
    pub async fn register(
        &self,
        agency_id: Uuid,
        input: NewDocument,
    ) -> Result<Document, DocumentError> {
        if !is_agency_path(agency_id, &input.file_path) {
            return Err(DocumentError::PathOutsideAgency(input.file_path));
        }

        let links = self
            .check_links(agency_id, input.client_id, input.policy_id)
            .await?;

        self.repo
            .create(
                agency_id,
                NewDocument {
                    client_id: links.client_id,
                    policy_id: links.policy_id,
                    ..input
                },
            )
            .await
    }

    /// Get a signed download URL for a document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Storage is not configured
    /// - Document not found
    /// - Presigning fails
    pub async fn download_url(
        &self,
        document_id: Uuid,
        agency_id: Uuid,
        expires_in: Option<u64>,
    ) -> Result<PresignedUrl, DocumentError> {
        let storage = self.storage()?;
        let document = self.get_by_id(document_id, agency_id).await?;

        Ok(storage
            .presign_download(&document.file_path, expires_in)
            .await?)
    }

    /// Delete a document: the stored object first, then the record.
    ///
    /// A failed object removal does not stop the record from being deleted;
    /// it is reported in the result instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not exist or the database
    /// operation fails.
    pub async fn delete(
        &self,
        document_id: Uuid,
        agency_id: Uuid,
    ) -> Result<DeletedDocument, DocumentError> {
        let document = self.get_by_id(document_id, agency_id).await?;

        let storage_error = match &self.storage {
            Some(storage) => storage.delete(&document.file_path).await.err(),
            None => None,
        };

        if !self.repo.delete(document_id, agency_id).await? {
            return Err(DocumentError::NotFound(document_id));
        }

        Ok(DeletedDocument {
            document,
            storage_error,
        })
    }

    /// Get document by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if document not found or database operation fails.
    pub async fn get_by_id(
        &self,
        document_id: Uuid,
        agency_id: Uuid,
    ) -> Result<Document, DocumentError> {
        self.repo
            .find_by_id(document_id, agency_id)
            .await?
            .ok_or(DocumentError::NotFound(document_id))
    }
}
