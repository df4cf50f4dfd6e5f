//! Request extractors and parsing helpers shared by the handlers.
//!
//! Rejections are rendered with the standard error envelope instead of
//! axum's plain-text bodies.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use brokerdesk_shared::types::PageRequest;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::error::ApiError;

/// JSON body that has been deserialized and validated.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;

        value.validate()?;

        Ok(Self(value))
    }
}

/// Query string parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;

        Ok(Self(value))
    }
}

/// Parses a record id from a path or query value.
///
/// `entity` names the record in the error, e.g. `"client"` gives
/// `Invalid client ID format`.
pub fn parse_id(raw: &str, entity: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::validation(format!("Invalid {entity} ID format")))
}

/// Parses an optional id filter; blank values mean no filter.
pub fn parse_optional_id(raw: Option<&str>, entity: &str) -> Result<Option<Uuid>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_id(raw, entity).map(Some),
    }
}

/// Parses one of a closed set of values, listing the allowed ones on failure.
pub fn parse_choice<T: Copy>(
    raw: &str,
    field: &str,
    all: &[T],
    as_str: fn(&T) -> &'static str,
) -> Result<T, ApiError> {
    let raw = raw.trim();
    all.iter().copied().find(|v| as_str(v) == raw).ok_or_else(|| {
        let allowed: Vec<_> = all.iter().map(as_str).collect();
        ApiError::validation(format!(
            "Invalid {field}. Must be one of: {}",
            allowed.join(", ")
        ))
    })
}

/// Parses an optional filter value from a closed set; blank means no filter.
pub fn parse_optional_choice<T: Copy>(
    raw: Option<&str>,
    field: &str,
    all: &[T],
    as_str: fn(&T) -> &'static str,
) -> Result<Option<T>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_choice(raw, field, all, as_str).map(Some),
    }
}

/// Builds a page request from signed query values. Negative values are
/// treated like zero and clamp to the minimum.
pub fn page_request(page: Option<i64>, limit: Option<i64>) -> PageRequest {
    let unsigned = |v: i64| u64::try_from(v).unwrap_or(0);
    PageRequest::from_query(page.map(unsigned), limit.map(unsigned))
}

/// Deserializes a field that distinguishes "absent" from "null".
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`: an
/// absent field stays `None`, `null` becomes `Some(None)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Deserializes a query value that falls back to `None` when it is blank
/// or does not parse.
///
/// Use with `#[serde(default, deserialize_with = "lenient")]`, so
/// `?days=` and `?limit=abc` mean "use the default" rather than a 400.
/// Flags only accept `true` and `false`.
pub fn lenient<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: FromStr,
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse().ok()))
}

/// Deserializes an optional text field where `null` clears the value.
///
/// Use with `#[serde(default, deserialize_with = "null_as_empty")]`: an
/// absent field stays `None`, `null` becomes `Some("")`, which the
/// repositories store as NULL.
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|value| Some(value.unwrap_or_default()))
}

/// Rejects values that are empty after trimming.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Accepts a blank value (no email) or a valid address.
pub fn email_or_blank(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.validate_email() {
        return Ok(());
    }
    Err(ValidationError::new("email"))
}
