//! API route definitions.

use axum::{Router, middleware};
use brokerdesk_core::renewal::today_in;
use brokerdesk_db::AgencyRepository;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::auth::auth_middleware};

pub mod activities;
pub mod clients;
pub mod dashboard;
pub mod documents;
pub mod health;
pub mod notes;
pub mod policies;
pub mod search;

#[cfg(test)]
pub(crate) mod test_support;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(clients::routes())
        .merge(policies::routes())
        .merge(activities::routes())
        .merge(documents::routes())
        .merge(notes::routes())
        .merge(dashboard::routes())
        .merge(search::routes())
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}

/// The current calendar date in the agency's time zone.
pub(crate) async fn agency_today(state: &AppState, agency_id: Uuid) -> Result<NaiveDate, ApiError> {
    let tz = AgencyRepository::new((*state.db).clone())
        .timezone(agency_id, &state.timezones)
        .await?;

    Ok(today_in(tz, Utc::now()))
}
