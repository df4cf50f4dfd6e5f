//! Activity routes: follow-ups, calls, meetings and other tasks.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use brokerdesk_core::activity::{ActivityChanges, ActivityType, NewActivity};
use brokerdesk_core::listing::{ActivitySort, Sort};
use brokerdesk_core::renewal::clamp_days;
use brokerdesk_db::ActivityRepository;
use brokerdesk_db::repositories::ActivityFilter;
use brokerdesk_shared::types::{ApiResponse, PageResponse};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::extractors::{
    QueryParams, ValidatedJson, double_option, lenient, not_blank, page_request, parse_choice,
    parse_id, parse_optional_choice, parse_optional_id,
};
use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Default look-ahead for upcoming activities, in days.
const DEFAULT_UPCOMING_DAYS: i64 = 7;

/// Creates the activity routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/activities", get(list_activities).post(create_activity))
        .route("/activities/upcoming", get(upcoming_activities))
        .route(
            "/activities/{id}",
            get(get_activity).put(update_activity).delete(delete_activity),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for listing activities.
#[derive(Debug, Default, Deserialize)]
pub struct ListActivitiesQuery {
    /// Page number (1-indexed).
    #[serde(default, deserialize_with = "lenient")]
    pub page: Option<i64>,
    /// Page size.
    #[serde(default, deserialize_with = "lenient")]
    pub limit: Option<i64>,
    /// Only activities of this client.
    pub client_id: Option<String>,
    /// Only activities of this policy.
    pub policy_id: Option<String>,
    /// Only activities of this kind.
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    /// Only completed (`true`) or open (`false`) activities.
    #[serde(default, deserialize_with = "lenient")]
    pub completed: Option<bool>,
    /// Sort column.
    #[serde(alias = "sortBy")]
    pub sort_by: Option<String>,
    /// Sort direction.
    #[serde(alias = "sortOrder")]
    pub sort_order: Option<String>,
}

/// Query parameters for upcoming activities.
#[derive(Debug, Default, Deserialize)]
pub struct UpcomingQuery {
    /// Look-ahead in days.
    #[serde(default, deserialize_with = "lenient")]
    pub days: Option<i64>,
}

/// Request body for creating an activity.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateActivityRequest {
    /// Kind of activity.
    #[serde(rename = "type")]
    pub activity_type: String,
    /// What needs doing.
    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: String,
    /// Linked client.
    pub client_id: Option<Uuid>,
    /// Linked policy.
    pub policy_id: Option<Uuid>,
    /// When the activity is due (RFC 3339).
    pub due_date: Option<DateTime<Utc>>,
}

/// Request body for updating an activity.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateActivityRequest {
    /// Kind of activity.
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    /// What needs doing.
    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: Option<String>,
    /// New due date; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// Completion flag.
    pub completed: Option<bool>,
}

fn parse_activity_type(raw: &str) -> Result<ActivityType, ApiError> {
    parse_choice(raw, "type", &ActivityType::ALL, ActivityType::as_str)
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/activities`
async fn list_activities(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<ListActivitiesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = ActivityFilter {
        client_id: parse_optional_id(query.client_id.as_deref(), "client")?,
        policy_id: parse_optional_id(query.policy_id.as_deref(), "policy")?,
        activity_type: parse_optional_choice(
            query.activity_type.as_deref(),
            "type",
            &ActivityType::ALL,
            ActivityType::as_str,
        )?,
        completed: query.completed,
    };
    let page = page_request(query.page, query.limit);
    let sort =
        Sort::<ActivitySort>::from_query(query.sort_by.as_deref(), query.sort_order.as_deref());

    let (activities, total) = ActivityRepository::new((*state.db).clone())
        .list(auth.agency_id(), filter, page, sort)
        .await?;

    Ok(Json(ApiResponse::ok(PageResponse::new(activities, page, total))))
}

/// GET `/activities/upcoming`
async fn upcoming_activities(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<UpcomingQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let days = clamp_days(query.days, DEFAULT_UPCOMING_DAYS);
    let until = Utc::now() + Duration::days(days);

    let activities = ActivityRepository::new((*state.db).clone())
        .upcoming(auth.agency_id(), until)
        .await?;

    Ok(Json(ApiResponse::ok(activities)))
}

/// GET `/activities/{id}`
async fn get_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "activity")?;

    let activity = ActivityRepository::new((*state.db).clone())
        .find_by_id(id, auth.agency_id())
        .await?
        .ok_or_else(|| ApiError::not_found("Activity not found"))?;

    Ok(Json(ApiResponse::ok(activity)))
}

/// POST `/activities`
async fn create_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateActivityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = NewActivity {
        activity_type: parse_activity_type(&payload.activity_type)?,
        description: payload.description,
        client_id: payload.client_id,
        policy_id: payload.policy_id,
        due_date: payload.due_date,
    };

    let activity = ActivityRepository::new((*state.db).clone())
        .create(auth.agency_id(), input)
        .await?;

    info!(
        agency_id = %auth.agency_id(),
        activity_id = %activity.id,
        activity_type = activity.activity_type.as_str(),
        "Activity created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            activity,
            "Activity created successfully",
        )),
    ))
}

/// PUT `/activities/{id}`
async fn update_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateActivityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "activity")?;
    let changes = ActivityChanges {
        activity_type: payload
            .activity_type
            .as_deref()
            .map(parse_activity_type)
            .transpose()?,
        description: payload.description,
        due_date: payload.due_date,
        completed: payload.completed,
    };

    let activity = ActivityRepository::new((*state.db).clone())
        .update(id, auth.agency_id(), changes, Utc::now())
        .await?;

    info!(
        agency_id = %auth.agency_id(),
        activity_id = %id,
        completed = activity.completed,
        "Activity updated"
    );

    Ok(Json(ApiResponse::with_message(
        activity,
        "Activity updated successfully",
    )))
}

/// DELETE `/activities/{id}`
async fn delete_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "activity")?;

    ActivityRepository::new((*state.db).clone())
        .delete(id, auth.agency_id())
        .await?;

    info!(agency_id = %auth.agency_id(), activity_id = %id, "Activity deleted");

    Ok(Json(ApiResponse::with_message(
        (),
        "Activity deleted successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{
        TestApp, activity_model, client_model, count_row, date, exec_result, json_body, mock_db,
        policy_model,
    };
    use brokerdesk_db::entities::{activities, clients};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_activities_with_filters() {
        let agency_id = Uuid::new_v4();
        let client = client_model(agency_id, "Maria", "Garcia");
        let activity = activity_model(agency_id, Some(client.id), None);
        let app = TestApp::new(
            mock_db()
                .append_query_results([vec![count_row(1)]])
                .append_query_results([vec![(activity.clone(), client.clone())]]),
        );

        let response = app
            .get(&format!(
                "/api/v1/activities?client_id={}&type=call&completed=false",
                client.id
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["data"]["total"], 1);
        assert_eq!(json["data"]["data"][0]["type"], "call");
        assert_eq!(json["data"]["data"][0]["client_name"], "Maria Garcia");
    }

    #[tokio::test]
    async fn test_list_ignores_unparsable_paging_and_flag() {
        let app = TestApp::new(
            mock_db()
                .append_query_results([vec![count_row(0)]])
                .append_query_results([Vec::<(activities::Model, clients::Model)>::new()]),
        );

        let response = app
            .get("/api/v1/activities?page=&limit=abc&completed=yes")
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["data"]["page"], 1);
        assert_eq!(json["data"]["limit"], 20);
    }

    #[tokio::test]
    async fn test_list_rejects_malformed_policy_filter() {
        let app = TestApp::new(mock_db());

        let response = app.get("/api/v1/activities?policy_id=abc").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["message"],
            "Invalid policy ID format"
        );
    }

    #[tokio::test]
    async fn test_upcoming_activities() {
        let agency_id = Uuid::new_v4();
        let client = client_model(agency_id, "James", "Wilson");
        let activity = activity_model(agency_id, Some(client.id), None);
        let app = TestApp::new(mock_db().append_query_results([vec![(activity.clone(), client)]]));

        let response = app.get("/api/v1/activities/upcoming?days=3").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["data"][0]["id"], activity.id.to_string());
        assert_eq!(json["data"][0]["client_name"], "James Wilson");
    }

    #[tokio::test]
    async fn test_create_activity_fills_client_from_policy() {
        let agency_id = Uuid::new_v4();
        let client = client_model(agency_id, "Sarah", "Chen");
        let policy = policy_model(agency_id, client.id, date(2027, 1, 1));
        let created = activity_model(agency_id, Some(client.id), Some(policy.id));
        let app = TestApp::new(
            mock_db()
                .append_query_results([vec![policy.clone()]])
                .append_query_results([vec![created.clone()]]),
        );

        let response = app
            .post(
                "/api/v1/activities",
                json!({
                    "type": "call",
                    "description": "Review coverage",
                    "policy_id": policy.id,
                    "due_date": "2026-10-20T15:00:00Z"
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = json_body(response).await;
        assert_eq!(json["message"], "Activity created successfully");
        assert_eq!(json["data"]["client_id"], client.id.to_string());
    }

    #[tokio::test]
    async fn test_create_activity_rejects_foreign_policy() {
        let agency_id = Uuid::new_v4();
        let owner = client_model(agency_id, "Sarah", "Chen");
        let other = client_model(agency_id, "James", "Wilson");
        let policy = policy_model(agency_id, owner.id, date(2027, 1, 1));
        let app = TestApp::new(
            mock_db()
                .append_query_results([vec![count_row(1)]])
                .append_query_results([vec![policy.clone()]]),
        );

        let response = app
            .post(
                "/api/v1/activities",
                json!({
                    "type": "task",
                    "description": "Call back",
                    "client_id": other.id,
                    "policy_id": policy.id
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_create_activity_requires_description() {
        let app = TestApp::new(mock_db());

        let response = app
            .post(
                "/api/v1/activities",
                json!({"type": "call", "description": "   "}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["message"],
            "Description is required"
        );
    }

    #[tokio::test]
    async fn test_create_activity_rejects_unknown_type() {
        let app = TestApp::new(mock_db());

        let response = app
            .post(
                "/api/v1/activities",
                json!({"type": "sms", "description": "Text the client"}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_complete_activity() {
        let agency_id = Uuid::new_v4();
        let existing = activity_model(agency_id, None, None);
        let mut done = existing.clone();
        done.completed = true;
        done.completed_at = Some(Utc::now().into());
        let app = TestApp::new(
            mock_db()
                .append_query_results([vec![existing.clone()]])
                .append_query_results([vec![done]]),
        );

        let response = app
            .put(
                &format!("/api/v1/activities/{}", existing.id),
                json!({"completed": true, "due_date": null}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["data"]["completed"], true);
        assert!(json["data"]["completed_at"].is_string());
    }

    #[tokio::test]
    async fn test_update_missing_activity() {
        let app =
            TestApp::new(mock_db().append_query_results([Vec::<activities::Model>::new()]));

        let response = app
            .put(
                &format!("/api/v1/activities/{}", Uuid::new_v4()),
                json!({"completed": true}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["message"], "Activity not found");
    }

    #[tokio::test]
    async fn test_get_missing_activity() {
        let app = TestApp::new(
            mock_db().append_query_results([Vec::<(activities::Model, clients::Model)>::new()]),
        );

        let response = app
            .get(&format!("/api/v1/activities/{}", Uuid::new_v4()))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_activity() {
        let app = TestApp::new(mock_db().append_exec_results([exec_result(0)]));

        let response = app
            .delete(&format!("/api/v1/activities/{}", Uuid::new_v4()))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
