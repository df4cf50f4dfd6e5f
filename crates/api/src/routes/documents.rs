//! Document routes: stored files linked to clients and policies.
//!
//! Files never pass through the API. Clients ask for a signed upload URL,
//! send the bytes straight to object storage, then register the record.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use brokerdesk_core::document::{DocumentService, NewDocument, RequestUploadInput};
use brokerdesk_core::listing::{DocumentSort, Sort};
use brokerdesk_db::DocumentRepository;
use brokerdesk_db::repositories::DocumentFilter;
use brokerdesk_shared::types::{ApiResponse, PageResponse};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::extractors::{
    QueryParams, ValidatedJson, lenient, not_blank, page_request, parse_id, parse_optional_id,
};
use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the document routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/documents", get(list_documents).post(create_document))
        .route("/documents/upload-url", post(request_upload_url))
        .route("/documents/{id}", get(get_document).delete(delete_document))
        .route("/documents/{id}/url", get(download_url))
}

fn document_service(state: &AppState) -> DocumentService<DocumentRepository> {
    DocumentService::new(
        state.storage.clone(),
        Arc::new(DocumentRepository::new((*state.db).clone())),
    )
}

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for listing documents.
#[derive(Debug, Default, Deserialize)]
pub struct ListDocumentsQuery {
    /// Page number (1-indexed).
    #[serde(default, deserialize_with = "lenient")]
    pub page: Option<i64>,
    /// Page size.
    #[serde(default, deserialize_with = "lenient")]
    pub limit: Option<i64>,
    /// Only documents of this client.
    pub client_id: Option<String>,
    /// Only documents of this policy.
    pub policy_id: Option<String>,
    /// Sort column.
    #[serde(alias = "sortBy")]
    pub sort_by: Option<String>,
    /// Sort direction.
    #[serde(alias = "sortOrder")]
    pub sort_order: Option<String>,
}

/// Query parameters for a download URL.
#[derive(Debug, Default, Deserialize)]
pub struct DownloadUrlQuery {
    /// Requested URL lifetime in seconds.
    #[serde(default, deserialize_with = "lenient")]
    pub expires_in: Option<u64>,
}

/// Request body for a signed upload URL.
#[derive(Debug, Deserialize, Validate)]
pub struct UploadUrlRequest {
    /// Original file name.
    #[validate(
        custom(function = "not_blank", message = "File name is required"),
        length(max = 255, message = "File name must be at most 255 characters")
    )]
    pub file_name: String,
    /// MIME type the client will upload with.
    #[validate(length(max = 100, message = "Content type must be at most 100 characters"))]
    pub content_type: Option<String>,
    /// Client the file belongs to.
    pub client_id: Option<Uuid>,
    /// Policy the file belongs to.
    pub policy_id: Option<Uuid>,
    /// Size in bytes, when known.
    pub file_size: Option<u64>,
}

/// Request body for registering an uploaded file.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDocumentRequest {
    /// Linked client.
    pub client_id: Option<Uuid>,
    /// Linked policy.
    pub policy_id: Option<Uuid>,
    /// Original file name.
    #[validate(
        custom(function = "not_blank", message = "File name is required"),
        length(max = 255, message = "File name must be at most 255 characters")
    )]
    pub file_name: String,
    /// Object key returned by the upload URL request.
    #[validate(custom(function = "not_blank", message = "File path is required"))]
    pub file_path: String,
    /// Size in bytes.
    #[validate(range(min = 0, message = "File size cannot be negative"))]
    pub file_size: Option<i64>,
    /// MIME type.
    #[validate(length(max = 100, message = "MIME type must be at most 100 characters"))]
    pub mime_type: Option<String>,
}

impl From<CreateDocumentRequest> for NewDocument {
    fn from(req: CreateDocumentRequest) -> Self {
        Self {
            client_id: req.client_id,
            policy_id: req.policy_id,
            file_name: req.file_name.trim().to_string(),
            file_path: req.file_path.trim().to_string(),
            file_size: req.file_size,
            mime_type: req.mime_type,
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/documents`
async fn list_documents(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<ListDocumentsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = DocumentFilter {
        client_id: parse_optional_id(query.client_id.as_deref(), "client")?,
        policy_id: parse_optional_id(query.policy_id.as_deref(), "policy")?,
    };
    let page = page_request(query.page, query.limit);
    let sort =
        Sort::<DocumentSort>::from_query(query.sort_by.as_deref(), query.sort_order.as_deref());

    let (documents, total) = DocumentRepository::new((*state.db).clone())
        .list(auth.agency_id(), filter, page, sort)
        .await?;

    Ok(Json(ApiResponse::ok(PageResponse::new(documents, page, total))))
}

/// GET `/documents/{id}`
async fn get_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "document")?;

    let document = document_service(&state)
        .get_by_id(id, auth.agency_id())
        .await?;

    Ok(Json(ApiResponse::ok(document)))
}

/// GET `/documents/{id}/url`
async fn download_url(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    QueryParams(query): QueryParams<DownloadUrlQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "document")?;

    let url = document_service(&state)
        .download_url(id, auth.agency_id(), query.expires_in)
        .await?;

    Ok(Json(ApiResponse::ok(url)))
}

/// POST `/documents/upload-url`
async fn request_upload_url(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<UploadUrlRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket = document_service(&state)
        .request_upload(RequestUploadInput {
            agency_id: auth.agency_id(),
            client_id: payload.client_id,
            policy_id: payload.policy_id,
            file_name: payload.file_name,
            content_type: payload.content_type,
            file_size: payload.file_size,
        })
        .await?;

    info!(agency_id = %auth.agency_id(), path = %ticket.path, "Upload URL issued");

    Ok(Json(ApiResponse::ok(ticket)))
}

/// POST `/documents`
async fn create_document(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateDocumentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let document = document_service(&state)
        .register(auth.agency_id(), payload.into())
        .await?;

    info!(
        agency_id = %auth.agency_id(),
        document_id = %document.id,
        "Document registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            document,
            "Document created successfully",
        )),
    ))
}

/// DELETE `/documents/{id}`
async fn delete_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "document")?;

    let deleted = document_service(&state)
        .delete(id, auth.agency_id())
        .await?;

    if let Some(err) = &deleted.storage_error {
        warn!(
            document_id = %id,
            path = %deleted.document.file_path,
            error = %err,
            "Failed to remove stored file"
        );
    }

    info!(agency_id = %auth.agency_id(), document_id = %id, "Document deleted");

    Ok(Json(ApiResponse::with_message(
        (),
        "Document deleted successfully",
    )))
}
