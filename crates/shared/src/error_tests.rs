use super::*;
use rstest::rstest;

#[rstest]
#[case(AppError::NotFound("test".into()), 404, "NOT_FOUND")]
#[case(AppError::Validation("test".into()), 400, "VALIDATION_ERROR")]
#[case(AppError::BusinessRule("test".into()), 422, "BUSINESS_RULE_VIOLATION")]
#[case(AppError::Conflict("test".into()), 409, "CONFLICT")]
#[case(AppError::ServiceUnavailable("test".into()), 503, "SERVICE_UNAVAILABLE")]
#[case(AppError::Database("test".into()), 500, "DATABASE_ERROR")]
#[case(AppError::ExternalService("test".into()), 500, "EXTERNAL_SERVICE_ERROR")]
fn test_app_error_status_and_code(
    #[case] error: AppError,
    #[case] status: u16,
    #[case] code: &str,
) {
    assert_eq!(error.status_code(), status);
    assert_eq!(error.error_code(), code);
}

#[test]
fn test_app_error_display() {
    assert_eq!(
        format!("{}", AppError::NotFound("Client not found".into())),
        "Not found: Client not found"
    );
    assert_eq!(
        format!("{}", AppError::Conflict("msg".into())),
        "Conflict: msg"
    );
    assert_eq!(
        format!("{}", AppError::ServiceUnavailable("msg".into())),
        "Service unavailable: msg"
    );
}

#[test]
fn test_public_message_passes_through_client_errors() {
    assert_eq!(
        AppError::NotFound("Client not found".into()).public_message(),
        "Client not found"
    );
    assert_eq!(
        AppError::Validation("first_name is required".into()).public_message(),
        "first_name is required"
    );
}

#[test]
fn test_public_message_hides_internal_detail() {
    let error = AppError::Database("connection refused to 10.0.0.4:5432".into());
    assert!(error.is_internal());
    assert_eq!(error.public_message(), "Internal server error");
    assert!(!AppError::Conflict("dup".into()).is_internal());
}
