//! Policy management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use brokerdesk_core::listing::{PolicySort, Sort};
use brokerdesk_core::policy::{NewPolicy, PolicyChanges, PolicyStatus, PolicyType};
use brokerdesk_core::renewal::RenewalWindow;
use brokerdesk_db::PolicyRepository;
use brokerdesk_db::repositories::PolicyFilter;
use brokerdesk_shared::types::{ApiResponse, PageResponse};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::agency_today;
use crate::extractors::{
    QueryParams, ValidatedJson, lenient, not_blank, page_request, parse_choice, parse_id,
    parse_optional_choice, parse_optional_id,
};
use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the policy routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/policies", get(list_policies).post(create_policy))
        .route("/policies/expiring", get(expiring_policies))
        .route(
            "/policies/{id}",
            get(get_policy).put(update_policy).delete(delete_policy),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for listing policies.
#[derive(Debug, Default, Deserialize)]
pub struct ListPoliciesQuery {
    /// Page number (1-indexed).
    #[serde(default, deserialize_with = "lenient")]
    pub page: Option<i64>,
    /// Page size.
    #[serde(default, deserialize_with = "lenient")]
    pub limit: Option<i64>,
    /// Only policies of this client.
    pub client_id: Option<String>,
    /// Only policies in this status.
    pub status: Option<String>,
    /// Only policies of this line.
    #[serde(rename = "type")]
    pub policy_type: Option<String>,
    /// Sort column.
    #[serde(alias = "sortBy")]
    pub sort_by: Option<String>,
    /// Sort direction.
    #[serde(alias = "sortOrder")]
    pub sort_order: Option<String>,
}

/// Query parameters for the expiring policies list.
#[derive(Debug, Default, Deserialize)]
pub struct ExpiringQuery {
    /// Window length in days.
    #[serde(default, deserialize_with = "lenient")]
    pub days: Option<i64>,
}

/// Request body for creating a policy.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePolicyRequest {
    /// Owning client.
    pub client_id: Uuid,
    /// Insurance carrier.
    #[validate(
        custom(function = "not_blank", message = "Carrier is required"),
        length(max = 255, message = "Carrier must be at most 255 characters")
    )]
    pub carrier: String,
    /// Carrier-issued policy number.
    #[validate(
        custom(function = "not_blank", message = "Policy number is required"),
        length(max = 100, message = "Policy number must be at most 100 characters")
    )]
    pub policy_number: String,
    /// Line of business.
    #[serde(rename = "type")]
    pub policy_type: String,
    /// First day of coverage (`YYYY-MM-DD`).
    pub effective_date: NaiveDate,
    /// Last day of coverage (`YYYY-MM-DD`).
    pub expiration_date: NaiveDate,
    /// Annual premium.
    pub premium: Decimal,
    /// Line-specific details object.
    pub details: Option<serde_json::Value>,
    /// Lifecycle status, `active` when omitted.
    pub status: Option<String>,
}

impl CreatePolicyRequest {
    fn into_new_policy(self) -> Result<NewPolicy, ApiError> {
        Ok(NewPolicy {
            client_id: self.client_id,
            policy_type: parse_choice(
                &self.policy_type,
                "type",
                &PolicyType::ALL,
                PolicyType::as_str,
            )?,
            status: parse_optional_choice(
                self.status.as_deref(),
                "status",
                &PolicyStatus::ALL,
                PolicyStatus::as_str,
            )?
            .unwrap_or_default(),
            carrier: self.carrier,
            policy_number: self.policy_number,
            effective_date: self.effective_date,
            expiration_date: self.expiration_date,
            premium: self.premium,
            details: self.details.unwrap_or_else(|| serde_json::json!({})),
        })
    }
}

/// Request body for updating a policy. Absent fields are left unchanged;
/// the owning client cannot be changed.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePolicyRequest {
    /// Insurance carrier.
    #[validate(
        custom(function = "not_blank", message = "Carrier is required"),
        length(max = 255, message = "Carrier must be at most 255 characters")
    )]
    pub carrier: Option<String>,
    /// Carrier-issued policy number.
    #[validate(
        custom(function = "not_blank", message = "Policy number is required"),
        length(max = 100, message = "Policy number must be at most 100 characters")
    )]
    pub policy_number: Option<String>,
    /// Line of business.
    #[serde(rename = "type")]
    pub policy_type: Option<String>,
    /// First day of coverage.
    pub effective_date: Option<NaiveDate>,
    /// Last day of coverage.
    pub expiration_date: Option<NaiveDate>,
    /// Annual premium.
    pub premium: Option<Decimal>,
    /// Line-specific details object.
    pub details: Option<serde_json::Value>,
    /// Lifecycle status.
    pub status: Option<String>,
}

impl UpdatePolicyRequest {
    fn into_changes(self) -> Result<PolicyChanges, ApiError> {
        Ok(PolicyChanges {
            policy_type: parse_optional_choice(
                self.policy_type.as_deref(),
                "type",
                &PolicyType::ALL,
                PolicyType::as_str,
            )?,
            status: parse_optional_choice(
                self.status.as_deref(),
                "status",
                &PolicyStatus::ALL,
                PolicyStatus::as_str,
            )?,
            carrier: self.carrier,
            policy_number: self.policy_number,
            effective_date: self.effective_date,
            expiration_date: self.expiration_date,
            premium: self.premium,
            details: self.details,
        })
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/policies`
async fn list_policies(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<ListPoliciesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = PolicyFilter {
        client_id: parse_optional_id(query.client_id.as_deref(), "client")?,
        status: parse_optional_choice(
            query.status.as_deref(),
            "status",
            &PolicyStatus::ALL,
            PolicyStatus::as_str,
        )?,
        policy_type: parse_optional_choice(
            query.policy_type.as_deref(),
            "type",
            &PolicyType::ALL,
            PolicyType::as_str,
        )?,
    };
    let page = page_request(query.page, query.limit);
    let sort =
        Sort::<PolicySort>::from_query(query.sort_by.as_deref(), query.sort_order.as_deref());

    let (policies, total) = PolicyRepository::new((*state.db).clone())
        .list(auth.agency_id(), filter, page, sort)
        .await?;

    Ok(Json(ApiResponse::ok(PageResponse::new(policies, page, total))))
}

/// GET `/policies/expiring`
///
/// Active policies expiring between today and `today + days`.
async fn expiring_policies(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<ExpiringQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let window = RenewalWindow::from_days(query.days);
    let today = agency_today(&state, auth.agency_id()).await?;

    let policies = PolicyRepository::new((*state.db).clone())
        .expiring(auth.agency_id(), today, window.end_date(today))
        .await?;

    Ok(Json(ApiResponse::ok(policies)))
}

/// GET `/policies/{id}`
async fn get_policy(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "policy")?;

    let policy = PolicyRepository::new((*state.db).clone())
        .find_by_id(id, auth.agency_id())
        .await?
        .ok_or_else(|| ApiError::not_found("Policy not found"))?;

    Ok(Json(ApiResponse::ok(policy)))
}

/// POST `/policies`
async fn create_policy(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreatePolicyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = payload.into_new_policy()?;

    let policy = PolicyRepository::new((*state.db).clone())
        .create(auth.agency_id(), input)
        .await?;

    info!(
        agency_id = %auth.agency_id(),
        user_id = %auth.user_id(),
        policy_id = %policy.id,
        client_id = %policy.client_id,
        "Policy created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(policy, "Policy created successfully")),
    ))
}

/// PUT `/policies/{id}`
async fn update_policy(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdatePolicyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "policy")?;
    let changes = payload.into_changes()?;

    let policy = PolicyRepository::new((*state.db).clone())
        .update(id, auth.agency_id(), changes)
        .await?;

    info!(agency_id = %auth.agency_id(), policy_id = %id, "Policy updated");

    Ok(Json(ApiResponse::with_message(
        policy,
        "Policy updated successfully",
    )))
}

/// DELETE `/policies/{id}`
async fn delete_policy(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "policy")?;

    PolicyRepository::new((*state.db).clone())
        .delete(id, auth.agency_id())
        .await?;

    info!(agency_id = %auth.agency_id(), policy_id = %id, "Policy deleted");

    Ok(Json(ApiResponse::with_message((), "Policy deleted successfully")))
}
