//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use brokerdesk_shared::{Claims, JwtError};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Stores the claims in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = request.headers().get(AUTHORIZATION) else {
        return ApiError::unauthorized("missing_token", "Authorization header is required")
            .into_response();
    };

    let Some(token) = auth_header.to_str().ok().and_then(extract_bearer_token) else {
        return ApiError::unauthorized("invalid_token", "Invalid or malformed token")
            .into_response();
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(JwtError::Expired) => {
            ApiError::unauthorized("token_expired", "Token has expired").into_response()
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            ApiError::unauthorized("invalid_token", "Invalid or malformed token").into_response()
        }
    }
}

/// Extractor for authenticated user claims.
///
/// Use this in handlers to get the caller and their agency:
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     let agency_id = auth.agency_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.0.user_id()
    }

    /// Returns the agency the request is scoped to.
    #[must_use]
    pub const fn agency_id(&self) -> Uuid {
        self.0.agency_id()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError::unauthorized("unauthorized", "Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{TestApp, json_body, mock_db};
    use axum::http::StatusCode;
    use brokerdesk_shared::JwtService;
    use brokerdesk_shared::jwt::JwtConfig;
    use chrono::{Duration, Utc};
    use rstest::rstest;

    #[rstest]
    #[case("Bearer abc.def", Some("abc.def"))]
    #[case("bearer abc.def", Some("abc.def"))]
    #[case("Bearer ", None)]
    #[case("Bearer    ", None)]
    #[case("Basic dXNlcjpwYXNz", None)]
    #[case("abc.def", None)]
    fn test_extract_bearer_token(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_bearer_token(header), expected);
    }

    #[tokio::test]
    async fn test_missing_header_is_rejected() {
        let app = TestApp::new(mock_db());

        let response = app.get_anonymous("/api/v1/clients").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "missing_token");
        assert_eq!(json["message"], "Authorization header is required");
    }

    #[rstest]
    #[case("Basic dXNlcjpwYXNz")]
    #[case("Bearer not-a-jwt")]
    #[tokio::test]
    async fn test_malformed_token_is_rejected(#[case] header: &str) {
        let app = TestApp::new(mock_db());

        let response = app.get_with_header("/api/v1/clients", header).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"], "invalid_token");
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_rejected() {
        let app = TestApp::new(mock_db());
        let forged = JwtService::new(JwtConfig {
            secret: "someone-elses-secret".to_string(),
            ..JwtConfig::default()
        })
        .issue_token(Uuid::new_v4(), app.agency_id, "agent")
        .unwrap();

        let response = app
            .get_with_header("/api/v1/clients", &format!("Bearer {forged}"))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"], "invalid_token");
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let app = TestApp::new(mock_db());
        let claims = Claims::new(
            Uuid::new_v4(),
            app.agency_id,
            "agent",
            Utc::now() - Duration::hours(1),
        );
        let expired = JwtService::new(JwtConfig::default())
            .encode_claims(&claims)
            .unwrap();

        let response = app
            .get_with_header("/api/v1/clients", &format!("Bearer {expired}"))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json = json_body(response).await;
        assert_eq!(json["error"], "token_expired");
        assert_eq!(json["message"], "Token has expired");
    }
}
