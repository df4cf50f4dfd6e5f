//! Client management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use brokerdesk_core::client::{ClientChanges, NewClient};
use brokerdesk_core::listing::{ClientSort, Sort};
use brokerdesk_db::ClientRepository;
use brokerdesk_db::repositories::ClientFilter;
use brokerdesk_shared::types::{ApiResponse, PageResponse};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::extractors::{
    QueryParams, ValidatedJson, email_or_blank, lenient, not_blank, null_as_empty, page_request,
    parse_id,
};
use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the client routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route(
            "/clients/{id}",
            get(get_client).put(update_client).delete(delete_client),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for listing clients.
#[derive(Debug, Default, Deserialize)]
pub struct ListClientsQuery {
    /// Page number (1-indexed).
    #[serde(default, deserialize_with = "lenient")]
    pub page: Option<i64>,
    /// Page size.
    #[serde(default, deserialize_with = "lenient")]
    pub limit: Option<i64>,
    /// Free-text search over name, email and phone.
    pub search: Option<String>,
    /// Sort column.
    #[serde(alias = "sortBy")]
    pub sort_by: Option<String>,
    /// Sort direction.
    #[serde(alias = "sortOrder")]
    pub sort_order: Option<String>,
}

/// Request body for creating a client.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    /// First name.
    #[validate(
        custom(function = "not_blank", message = "First name is required"),
        length(max = 100, message = "First name must be at most 100 characters")
    )]
    pub first_name: String,
    /// Last name.
    #[validate(
        custom(function = "not_blank", message = "Last name is required"),
        length(max = 100, message = "Last name must be at most 100 characters")
    )]
    pub last_name: String,
    /// Email address.
    #[validate(custom(function = "email_or_blank", message = "Invalid email address"))]
    pub email: Option<String>,
    /// Phone number.
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
    /// Mailing address.
    pub address: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl From<CreateClientRequest> for NewClient {
    fn from(req: CreateClientRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            address: req.address,
            notes: req.notes,
        }
    }
}

/// Request body for updating a client. Absent fields are left unchanged;
/// `null` or an empty string clears an optional field.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateClientRequest {
    /// First name.
    #[validate(
        custom(function = "not_blank", message = "First name is required"),
        length(max = 100, message = "First name must be at most 100 characters")
    )]
    pub first_name: Option<String>,
    /// Last name.
    #[validate(
        custom(function = "not_blank", message = "Last name is required"),
        length(max = 100, message = "Last name must be at most 100 characters")
    )]
    pub last_name: Option<String>,
    /// Email address.
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(custom(function = "email_or_blank", message = "Invalid email address"))]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
    /// Mailing address.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub address: Option<String>,
    /// Free-form notes.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: Option<String>,
}

impl From<UpdateClientRequest> for ClientChanges {
    fn from(req: UpdateClientRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email.map(Some),
            phone: req.phone.map(Some),
            address: req.address.map(Some),
            notes: req.notes.map(Some),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/clients`
async fn list_clients(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<ListClientsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = page_request(query.page, query.limit);
    let sort =
        Sort::<ClientSort>::from_query(query.sort_by.as_deref(), query.sort_order.as_deref());
    let filter = ClientFilter {
        search: query.search,
    };

    let (clients, total) = ClientRepository::new((*state.db).clone())
        .list(auth.agency_id(), &filter, page, sort)
        .await?;

    Ok(Json(ApiResponse::ok(PageResponse::new(clients, page, total))))
}

/// GET `/clients/{id}`
async fn get_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "client")?;

    let client = ClientRepository::new((*state.db).clone())
        .find_detail(id, auth.agency_id())
        .await?
        .ok_or_else(|| ApiError::not_found("Client not found"))?;

    Ok(Json(ApiResponse::ok(client)))
}

/// POST `/clients`
async fn create_client(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateClientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let client = ClientRepository::new((*state.db).clone())
        .create(auth.agency_id(), payload.into())
        .await?;

    info!(
        agency_id = %auth.agency_id(),
        user_id = %auth.user_id(),
        client_id = %client.id,
        "Client created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(client, "Client created successfully")),
    ))
}

/// PUT `/clients/{id}`
async fn update_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateClientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "client")?;

    let client = ClientRepository::new((*state.db).clone())
        .update(id, auth.agency_id(), payload.into())
        .await?;

    info!(agency_id = %auth.agency_id(), client_id = %id, "Client updated");

    Ok(Json(ApiResponse::with_message(
        client,
        "Client updated successfully",
    )))
}

/// DELETE `/clients/{id}`
async fn delete_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "client")?;

    ClientRepository::new((*state.db).clone())
        .delete(id, auth.agency_id())
        .await?;

    info!(
        agency_id = %auth.agency_id(),
        user_id = %auth.user_id(),
        client_id = %id,
        "Client deleted"
    );

    Ok(Json(ApiResponse::with_message((), "Client deleted successfully")))
}
