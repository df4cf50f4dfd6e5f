//! `SeaORM` active enums for the Postgres enum types.

use brokerdesk_core::{activity, policy};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "policy_type")]
pub enum PolicyType {
    #[sea_orm(string_value = "auto")]
    Auto,
    #[sea_orm(string_value = "home")]
    Home,
    #[sea_orm(string_value = "life")]
    Life,
    #[sea_orm(string_value = "health")]
    Health,
    #[sea_orm(string_value = "business")]
    Business,
    #[sea_orm(string_value = "umbrella")]
    Umbrella,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "policy_status")]
pub enum PolicyStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "expired")]
    Expired,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "pending")]
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "activity_type")]
pub enum ActivityType {
    #[sea_orm(string_value = "call")]
    Call,
    #[sea_orm(string_value = "email")]
    Email,
    #[sea_orm(string_value = "task")]
    Task,
    #[sea_orm(string_value = "meeting")]
    Meeting,
    #[sea_orm(string_value = "note")]
    Note,
}

// ============================================================================
// Domain conversions
// ============================================================================

impl From<policy::PolicyType> for PolicyType {
    fn from(value: policy::PolicyType) -> Self {
        match value {
            policy::PolicyType::Auto => Self::Auto,
            policy::PolicyType::Home => Self::Home,
            policy::PolicyType::Life => Self::Life,
            policy::PolicyType::Health => Self::Health,
            policy::PolicyType::Business => Self::Business,
            policy::PolicyType::Umbrella => Self::Umbrella,
            policy::PolicyType::Other => Self::Other,
        }
    }
}

impl From<PolicyType> for policy::PolicyType {
    fn from(value: PolicyType) -> Self {
        match value {
            PolicyType::Auto => Self::Auto,
            PolicyType::Home => Self::Home,
            PolicyType::Life => Self::Life,
            PolicyType::Health => Self::Health,
            PolicyType::Business => Self::Business,
            PolicyType::Umbrella => Self::Umbrella,
            PolicyType::Other => Self::Other,
        }
    }
}

impl From<policy::PolicyStatus> for PolicyStatus {
    fn from(value: policy::PolicyStatus) -> Self {
        match value {
            policy::PolicyStatus::Active => Self::Active,
            policy::PolicyStatus::Expired => Self::Expired,
            policy::PolicyStatus::Cancelled => Self::Cancelled,
            policy::PolicyStatus::Pending => Self::Pending,
        }
    }
}

impl From<PolicyStatus> for policy::PolicyStatus {
    fn from(value: PolicyStatus) -> Self {
        match value {
            PolicyStatus::Active => Self::Active,
            PolicyStatus::Expired => Self::Expired,
            PolicyStatus::Cancelled => Self::Cancelled,
            PolicyStatus::Pending => Self::Pending,
        }
    }
}

impl From<activity::ActivityType> for ActivityType {
    fn from(value: activity::ActivityType) -> Self {
        match value {
            activity::ActivityType::Call => Self::Call,
            activity::ActivityType::Email => Self::Email,
            activity::ActivityType::Task => Self::Task,
            activity::ActivityType::Meeting => Self::Meeting,
            activity::ActivityType::Note => Self::Note,
        }
    }
}

impl From<ActivityType> for activity::ActivityType {
    fn from(value: ActivityType) -> Self {
        match value {
            ActivityType::Call => Self::Call,
            ActivityType::Email => Self::Email,
            ActivityType::Task => Self::Task,
            ActivityType::Meeting => Self::Meeting,
            ActivityType::Note => Self::Note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_enum_values_match_domain_strings() {
        for t in PolicyType::iter() {
            assert_eq!(t.to_value(), policy::PolicyType::from(t).as_str());
        }
        for s in PolicyStatus::iter() {
            assert_eq!(s.to_value(), policy::PolicyStatus::from(s).as_str());
        }
        for t in ActivityType::iter() {
            assert_eq!(t.to_value(), activity::ActivityType::from(t).as_str());
        }
    }
}
