//! Global search route.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use brokerdesk_core::search::{SearchQuery, SearchResults};
use brokerdesk_db::SearchRepository;
use brokerdesk_shared::types::ApiResponse;
use serde::Deserialize;
use tracing::debug;

use crate::extractors::{QueryParams, lenient};
use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the search routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/search", get(search))
}

/// Query parameters for global search.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Search term.
    pub q: Option<String>,
    /// Results per category.
    #[serde(default, deserialize_with = "lenient")]
    pub limit: Option<i64>,
}

/// GET `/search?q=`
async fn search(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = params.limit.map(|n| u64::try_from(n).unwrap_or(1));
    let Some(query) = SearchQuery::parse(params.q.as_deref(), limit) else {
        return Ok(Json(ApiResponse::ok(SearchResults::default())));
    };

    let results = SearchRepository::new((*state.db).clone())
        .search(auth.agency_id(), &query)
        .await?;

    debug!(
        agency_id = %auth.agency_id(),
        term = query.term(),
        hits = results.total(),
        "Search completed"
    );

    Ok(Json(ApiResponse::ok(results)))
}
