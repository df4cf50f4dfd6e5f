//! Clients of the agency.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::policy::Policy;

/// A client record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Client ID.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        display_name(&self.first_name, &self.last_name)
    }
}

/// A client row from the summary view, with policy aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSummary {
    /// The client.
    #[serde(flatten)]
    pub client: Client,
    /// Number of policies of any status.
    pub policy_count: i64,
    /// Number of active policies.
    pub active_policies: i64,
    /// Sum of premiums over active policies.
    pub total_premium: Decimal,
}

/// A client with all of its policies, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientDetail {
    /// The client.
    #[serde(flatten)]
    pub client: Client,
    /// Policies owned by the client.
    pub policies: Vec<Policy>,
}

/// Input for creating a client.
#[derive(Debug, Clone, Default)]
pub struct NewClient {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Partial update for a client.
///
/// Nullable columns use `Option<Option<_>>`: `None` leaves the value,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct ClientChanges {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New email.
    pub email: Option<Option<String>>,
    /// New phone.
    pub phone: Option<Option<String>>,
    /// New address.
    pub address: Option<Option<String>>,
    /// New notes.
    pub notes: Option<Option<String>>,
}

/// Joins first and last name, tolerating blanks.
#[must_use]
pub fn display_name(first: &str, last: &str) -> String {
    match (first.trim(), last.trim()) {
        ("", last) => last.to_string(),
        (first, "") => first.to_string(),
        (first, last) => format!("{first} {last}"),
    }
}

/// Trims optional text, mapping blank values to `None`.
#[must_use]
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Key used for case-insensitive email uniqueness.
#[must_use]
pub fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}
