//! Dashboard routes: headline numbers, renewals and open follow-ups.
//!
//! Day counts are relative to the current date in the agency's time zone.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use brokerdesk_core::renewal::{RenewalWindow, clamp_days};
use brokerdesk_db::DashboardRepository;
use brokerdesk_shared::types::ApiResponse;
use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::debug;

use super::agency_today;
use crate::extractors::{QueryParams, lenient};
use crate::{AppState, error::ApiError, middleware::AuthUser};

const DEFAULT_ACTIVITY_LIMIT: u64 = 10;
const MAX_ACTIVITY_LIMIT: u64 = 50;
const DEFAULT_ACTIVITY_DAYS: i64 = 7;

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/stats", get(get_stats))
        .route("/dashboard/renewals", get(get_renewals))
        .route(
            "/dashboard/upcoming-activities",
            get(get_upcoming_activities),
        )
}

/// Query parameters for the renewals list.
#[derive(Debug, Default, Deserialize)]
pub struct RenewalsQuery {
    /// Window length in days.
    #[serde(default, deserialize_with = "lenient")]
    pub days: Option<i64>,
}

/// Query parameters for upcoming activities.
#[derive(Debug, Default, Deserialize)]
pub struct UpcomingActivitiesQuery {
    /// Maximum rows.
    #[serde(default, deserialize_with = "lenient")]
    pub limit: Option<i64>,
    /// Look-ahead in days.
    #[serde(default, deserialize_with = "lenient")]
    pub days: Option<i64>,
}

fn activity_limit(requested: Option<i64>) -> u64 {
    requested
        .map_or(DEFAULT_ACTIVITY_LIMIT, |n| u64::try_from(n).unwrap_or(1))
        .clamp(1, MAX_ACTIVITY_LIMIT)
}

/// GET `/dashboard/stats`
async fn get_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let today = agency_today(&state, auth.agency_id()).await?;

    let stats = DashboardRepository::new((*state.db).clone())
        .stats(auth.agency_id(), today)
        .await?;

    Ok(Json(ApiResponse::ok(stats)))
}

/// GET `/dashboard/renewals`
async fn get_renewals(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<RenewalsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let window = RenewalWindow::from_days(query.days);
    let today = agency_today(&state, auth.agency_id()).await?;

    let renewals = DashboardRepository::new((*state.db).clone())
        .renewals(auth.agency_id(), today, window)
        .await?;

    debug!(
        agency_id = %auth.agency_id(),
        %today,
        days = window.days(),
        count = renewals.len(),
        "Loaded renewals"
    );

    let message = format!(
        "Found {} policies expiring in the next {} days",
        renewals.len(),
        window.days()
    );

    Ok(Json(ApiResponse::with_message(renewals, message)))
}

/// GET `/dashboard/upcoming-activities`
async fn get_upcoming_activities(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<UpcomingActivitiesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = activity_limit(query.limit);
    let until = Utc::now() + Duration::days(clamp_days(query.days, DEFAULT_ACTIVITY_DAYS));

    let activities = DashboardRepository::new((*state.db).clone())
        .upcoming_activities(auth.agency_id(), until, limit)
        .await?;

    Ok(Json(ApiResponse::ok(activities)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{
        TestApp, activity_model, client_model, count_row, json_body, mock_db, policy_model,
    };
    use axum::http::StatusCode;
    use brokerdesk_db::entities::{activities, clients, policies};
    use rstest::rstest;
    use sea_orm::Value;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    #[rstest]
    #[case(None, 10)]
    #[case(Some(0), 1)]
    #[case(Some(-5), 1)]
    #[case(Some(25), 25)]
    #[case(Some(500), 50)]
    fn test_activity_limit(#[case] requested: Option<i64>, #[case] expected: u64) {
        assert_eq!(activity_limit(requested), expected);
    }

    #[tokio::test]
    async fn test_stats() {
        let premium = BTreeMap::from([(
            "total_premium".to_string(),
            Value::Decimal(Some(Box::new(rust_decimal_macros::dec!(48250.75)))),
        )]);
        let app = TestApp::new(
            mock_db()
                .append_query_results([vec![count_row(12)]])
                .append_query_results([vec![count_row(30)]])
                .append_query_results([vec![count_row(24)]])
                .append_query_results([vec![count_row(9)]])
                .append_query_results([vec![premium]])
                .append_query_results([vec![count_row(4)]])
                .append_query_results([vec![count_row(1)]]),
        );

        let response = app.get("/api/v1/dashboard/stats").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["data"]["total_clients"], 12);
        assert_eq!(json["data"]["active_policies"], 24);
        assert_eq!(json["data"]["total_premium"], "48250.75");
        assert_eq!(json["data"]["urgent_renewals"], 1);
    }

    #[tokio::test]
    async fn test_renewals_message_and_rows() {
        let agency_id = Uuid::new_v4();
        let client = client_model(agency_id, "Maria", "Garcia");
        let today = Utc::now().date_naive();
        let policy = policy_model(agency_id, client.id, today + Duration::days(3));
        let app = TestApp::new(mock_db().append_query_results([vec![(policy, client)]]));

        let response = app.get("/api/v1/dashboard/renewals?days=14").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(
            json["message"],
            "Found 1 policies expiring in the next 14 days"
        );
        let row = &json["data"][0];
        assert_eq!(row["client_first_name"], "Maria");
        assert_eq!(row["client_email"], "maria@example.com");
        assert_eq!(row["days_until_expiration"], 3);
        assert_eq!(row["urgency"], "urgent");
    }

    #[tokio::test]
    async fn test_renewals_clamp_window() {
        let app = TestApp::new(
            mock_db().append_query_results([Vec::<(policies::Model, clients::Model)>::new()]),
        );

        let response = app.get("/api/v1/dashboard/renewals?days=1000").await;
        assert_eq!(
            json_body(response).await["message"],
            "Found 0 policies expiring in the next 365 days"
        );
    }

    #[rstest]
    #[case("/api/v1/dashboard/renewals?days=")]
    #[case("/api/v1/dashboard/renewals?days=abc")]
    #[tokio::test]
    async fn test_renewals_unparsable_window_uses_default(#[case] uri: &str) {
        let app = TestApp::new(
            mock_db().append_query_results([Vec::<(policies::Model, clients::Model)>::new()]),
        );

        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await["message"],
            "Found 0 policies expiring in the next 30 days"
        );
    }

    #[tokio::test]
    async fn test_upcoming_activities_ignores_unparsable_limit() {
        let app = TestApp::new(
            mock_db().append_query_results([Vec::<(activities::Model, clients::Model)>::new()]),
        );

        let response = app
            .get("/api/v1/dashboard/upcoming-activities?limit=abc&days=")
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_upcoming_activities() {
        let agency_id = Uuid::new_v4();
        let client = client_model(agency_id, "James", "Wilson");
        let activity = activity_model(agency_id, Some(client.id), None);
        let app = TestApp::new(mock_db().append_query_results([vec![(activity.clone(), client)]]));

        let response = app
            .get("/api/v1/dashboard/upcoming-activities?limit=5&days=3")
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["data"][0]["id"], activity.id.to_string());
        assert_eq!(json["data"][0]["client_name"], "James Wilson");
        assert!(json["data"][0]["policy_number"].is_null());
    }
}
