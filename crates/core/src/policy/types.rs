//! Policy data types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Line of insurance a policy covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyType {
    /// Auto insurance.
    Auto,
    /// Homeowners insurance.
    Home,
    /// Life insurance.
    Life,
    /// Health insurance.
    Health,
    /// Commercial / business insurance.
    Business,
    /// Umbrella liability.
    Umbrella,
    /// Anything else.
    Other,
}

impl PolicyType {
    /// All policy types in display order.
    pub const ALL: [Self; 7] = [
        Self::Auto,
        Self::Home,
        Self::Life,
        Self::Health,
        Self::Business,
        Self::Umbrella,
        Self::Other,
    ];

    /// Convert to database string value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Home => "home",
            Self::Life => "life",
            Self::Health => "health",
            Self::Business => "business",
            Self::Umbrella => "umbrella",
            Self::Other => "other",
        }
    }

    /// Parse from database string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// Lifecycle status of a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    /// In force.
    #[default]
    Active,
    /// Past its expiration date.
    Expired,
    /// Cancelled before expiration.
    Cancelled,
    /// Bound but not yet in force.
    Pending,
}

impl PolicyStatus {
    /// All statuses.
    pub const ALL: [Self; 4] = [Self::Active, Self::Expired, Self::Cancelled, Self::Pending];

    /// Convert to database string value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
            Self::Pending => "pending",
        }
    }

    /// Parse from database string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// A policy record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Policy ID.
    pub id: Uuid,
    /// Owning client.
    pub client_id: Uuid,
    /// Insurance carrier name.
    pub carrier: String,
    /// Carrier-issued policy number.
    pub policy_number: String,
    /// Line of insurance.
    #[serde(rename = "type")]
    pub policy_type: PolicyType,
    /// First day of coverage.
    pub effective_date: NaiveDate,
    /// Last day of coverage.
    pub expiration_date: NaiveDate,
    /// Annual premium.
    pub premium: Decimal,
    /// Type-specific details (vehicles, coverage limits, ...).
    pub details: serde_json::Value,
    /// Current status.
    pub status: PolicyStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A policy joined with its client's display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyWithClient {
    /// The policy.
    #[serde(flatten)]
    pub policy: Policy,
    /// "First Last" of the owning client.
    pub client_name: Option<String>,
}

/// Input for creating a policy.
#[derive(Debug, Clone)]
pub struct NewPolicy {
    /// Owning client.
    pub client_id: Uuid,
    /// Carrier name.
    pub carrier: String,
    /// Policy number.
    pub policy_number: String,
    /// Line of insurance.
    pub policy_type: PolicyType,
    /// First day of coverage.
    pub effective_date: NaiveDate,
    /// Last day of coverage.
    pub expiration_date: NaiveDate,
    /// Annual premium.
    pub premium: Decimal,
    /// Type-specific details.
    pub details: serde_json::Value,
    /// Initial status.
    pub status: PolicyStatus,
}

/// Partial update for a policy. The owning client cannot change.
#[derive(Debug, Clone, Default)]
pub struct PolicyChanges {
    /// New carrier name.
    pub carrier: Option<String>,
    /// New policy number.
    pub policy_number: Option<String>,
    /// New line of insurance.
    pub policy_type: Option<PolicyType>,
    /// New effective date.
    pub effective_date: Option<NaiveDate>,
    /// New expiration date.
    pub expiration_date: Option<NaiveDate>,
    /// New premium.
    pub premium: Option<Decimal>,
    /// New details.
    pub details: Option<serde_json::Value>,
    /// New status.
    pub status: Option<PolicyStatus>,
}

impl PolicyChanges {
    /// Returns true if nothing would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.carrier.is_none()
            && self.policy_number.is_none()
            && self.policy_type.is_none()
            && self.effective_date.is_none()
            && self.expiration_date.is_none()
            && self.premium.is_none()
            && self.details.is_none()
            && self.status.is_none()
    }

    /// Coverage dates after applying these changes to `current`.
    #[must_use]
    pub fn merged_term(&self, current: &Policy) -> (NaiveDate, NaiveDate) {
        (
            self.effective_date.unwrap_or(current.effective_date),
            self.expiration_date.unwrap_or(current.expiration_date),
        )
    }
}
