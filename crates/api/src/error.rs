//! API error type and its JSON rendering.
//!
//! Handlers return `Result<_, ApiError>`. Repository and service errors
//! convert into it with `?`, picking the status code and message the caller
//! sees. Internal details are logged, never returned.

use std::borrow::Cow;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use brokerdesk_core::document::DocumentError;
use brokerdesk_core::storage::StorageError;
use brokerdesk_db::repositories::{ActivityError, ClientError, NoteError, PolicyError};
use brokerdesk_shared::AppError;
use brokerdesk_shared::types::ErrorBody;
use sea_orm::DbErr;
use validator::ValidationErrors;

/// An error response: status, machine-readable code and caller-facing message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: Cow<'static, str>,
    message: String,
    detail: Option<String>,
}

impl ApiError {
    /// Creates an error with an explicit status and code.
    pub fn new(
        status: StatusCode,
        code: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            detail: None,
        }
    }

    /// 401 with a token-specific code.
    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code, message)
    }

    /// 400 `VALIDATION_ERROR`.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into()).into()
    }

    /// 404 `NOT_FOUND`.
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into()).into()
    }

    /// 503 returned by URL operations when no storage backend is configured.
    pub fn storage_not_configured() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "storage_not_configured",
            "File storage is not configured",
        )
    }

    /// The HTTP status this error renders with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// The machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The message returned to the caller.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                code = %self.code,
                detail = self.detail.as_deref().unwrap_or(&self.message),
                "Request failed"
            );
        }

        (self.status, Json(ErrorBody::new(self.code, self.message))).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let detail = err.is_internal().then(|| err.to_string());

        Self {
            status,
            code: Cow::Borrowed(err.error_code()),
            message: err.public_message().to_string(),
            detail,
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        AppError::Database(err.to_string()).into()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::validation(validation_message(&errors))
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound(_) => Self::not_found("Client not found"),
            ClientError::DuplicateEmail(_) => {
                AppError::Conflict("A client with this email already exists".to_string()).into()
            }
            ClientError::Database(e) => e.into(),
        }
    }
}

impl From<PolicyError> for ApiError {
    fn from(err: PolicyError) -> Self {
        use brokerdesk_core::policy::PolicyError as Rule;

        match err {
            PolicyError::NotFound(_) => Self::not_found("Policy not found"),
            PolicyError::ClientNotFound(_) => Self::not_found("Client not found"),
            PolicyError::Invalid(rule @ Rule::InvalidTerm { .. }) => {
                AppError::BusinessRule(rule.to_string()).into()
            }
            PolicyError::Invalid(rule) => Self::validation(rule.to_string()),
            PolicyError::Database(e) => e.into(),
        }
    }
}

impl From<ActivityError> for ApiError {
    fn from(err: ActivityError) -> Self {
        match err {
            ActivityError::NotFound(_) => Self::not_found("Activity not found"),
            ActivityError::ClientNotFound(_) => Self::not_found("Client not found"),
            ActivityError::PolicyNotFound(_) => Self::not_found("Policy not found"),
            ActivityError::Link(e) => AppError::BusinessRule(e.to_string()).into(),
            ActivityError::Database(e) => e.into(),
        }
    }
}

impl From<NoteError> for ApiError {
    fn from(err: NoteError) -> Self {
        match err {
            NoteError::NotFound(_) => Self::not_found("Note not found"),
            NoteError::ClientNotFound(_) => Self::not_found("Client not found"),
            NoteError::Database(e) => e.into(),
        }
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NotFound(_) => Self::not_found("Document not found"),
            DocumentError::ClientNotFound(_) => Self::not_found("Client not found"),
            DocumentError::PolicyNotFound(_) => Self::not_found("Policy not found"),
            DocumentError::Link(e) => AppError::BusinessRule(e.to_string()).into(),
            DocumentError::PathOutsideAgency(_) => AppError::BusinessRule(
                "file_path must be inside the agency's storage folder".to_string(),
            )
            .into(),
            DocumentError::DuplicatePath(_) => AppError::Conflict(
                "A document is already registered at this path".to_string(),
            )
            .into(),
            DocumentError::StorageNotConfigured => Self::storage_not_configured(),
            DocumentError::Storage(e) => e.into(),
            DocumentError::Repository(msg) => AppError::Database(msg).into(),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::FileTooLarge { .. } | StorageError::InvalidMimeType { .. } => {
                Self::validation(err.to_string())
            }
            StorageError::PresignNotSupported => AppError::ServiceUnavailable(
                "Signed URLs are not supported by the storage provider".to_string(),
            )
            .into(),
            StorageError::NotFound { .. } => Self::not_found("Stored file not found"),
            StorageError::Configuration(_) | StorageError::Operation(_) => {
                AppError::ExternalService(err.to_string()).into()
            }
        }
    }
}

/// Joins field validation messages with ", " in field order.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map_or_else(|| format!("{field} is invalid"), ToString::to_string)
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;
    use uuid::Uuid;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_renders_envelope() {
        let (status, json) = body_json(ApiError::not_found("Client not found")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "NOT_FOUND", "message": "Client not found"})
        );
    }

    #[tokio::test]
    async fn test_database_detail_is_hidden() {
        let err: ApiError = DbErr::Custom("relation \"clients\" does not exist".into()).into();
        let (status, json) = body_json(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "DATABASE_ERROR");
        assert_eq!(json["message"], "Internal server error");
    }

    #[rstest]
    #[case(ClientError::NotFound(Uuid::nil()), StatusCode::NOT_FOUND, "Client not found")]
    #[case(
        ClientError::DuplicateEmail("a@b.co".into()),
        StatusCode::CONFLICT,
        "A client with this email already exists"
    )]
    fn test_client_errors(
        #[case] err: ClientError,
        #[case] status: StatusCode,
        #[case] message: &str,
    ) {
        let err = ApiError::from(err);
        assert_eq!(err.status(), status);
        assert_eq!(err.message(), message);
    }

    #[test]
    fn test_term_violation_is_unprocessable() {
        let date = chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let err = ApiError::from(PolicyError::Invalid(
            brokerdesk_core::policy::PolicyError::InvalidTerm {
                effective: date,
                expiration: date,
            },
        ));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "BUSINESS_RULE_VIOLATION");
    }

    #[rstest]
    #[case(brokerdesk_core::policy::PolicyError::NegativePremium(rust_decimal::Decimal::NEGATIVE_ONE))]
    #[case(brokerdesk_core::policy::PolicyError::PremiumTooLarge(rust_decimal::Decimal::MAX))]
    #[case(brokerdesk_core::policy::PolicyError::PremiumPrecision(rust_decimal::Decimal::new(1, 3)))]
    fn test_premium_rules_are_bad_request(#[case] rule: brokerdesk_core::policy::PolicyError) {
        let err = ApiError::from(PolicyError::Invalid(rule));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_storage_not_configured() {
        let err = ApiError::from(DocumentError::StorageNotConfigured);
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.code(), "storage_not_configured");
    }

    #[test]
    fn test_storage_rejections_are_bad_request() {
        let err = ApiError::from(DocumentError::Storage(StorageError::file_too_large(20, 10)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_validation_message_joins_fields() {
        use validator::ValidationError;

        let mut errors = ValidationErrors::new();
        errors.add(
            "last_name",
            ValidationError::new("length").with_message("Last name is required".into()),
        );
        errors.add(
            "first_name",
            ValidationError::new("length").with_message("First name is required".into()),
        );
        errors.add("phone", ValidationError::new("length"));

        assert_eq!(
            validation_message(&errors),
            "First name is required, Last name is required, phone is invalid"
        );
    }
}
