//! Dashboard data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::activity::Activity;
use crate::client::Client;
use crate::policy::Policy;
use crate::renewal::{RenewalUrgency, URGENT_DAYS, days_until_expiration};

/// Headline numbers for the agency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Number of clients.
    pub total_clients: u64,
    /// Number of policies of any status.
    pub total_policies: u64,
    /// Number of active policies.
    pub active_policies: u64,
    /// Activities not yet completed.
    pub pending_activities: u64,
    /// Sum of premiums over active policies.
    pub total_premium: Decimal,
    /// Active policies expiring within the default renewal window.
    pub expiring_soon: u64,
    /// Active policies expiring within the urgent threshold.
    pub urgent_renewals: u64,
}

/// A policy up for renewal, flattened with its client's contact details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenewalItem {
    /// The policy.
    #[serde(flatten)]
    pub policy: Policy,
    /// Client given name.
    pub client_first_name: Option<String>,
    /// Client family name.
    pub client_last_name: Option<String>,
    /// Client email.
    pub client_email: Option<String>,
    /// Client phone.
    pub client_phone: Option<String>,
    /// Days from today until expiration.
    pub days_until_expiration: i64,
    /// Urgency bucket for the day count.
    pub urgency: RenewalUrgency,
}

impl RenewalItem {
    /// Builds a renewal row as seen on `today`.
    #[must_use]
    pub fn new(policy: Policy, client: Option<Client>, today: NaiveDate) -> Self {
        let days = days_until_expiration(policy.expiration_date, today);
        let (first, last, email, phone) = match client {
            Some(c) => (Some(c.first_name), Some(c.last_name), c.email, c.phone),
            None => (None, None, None, None),
        };

        Self {
            policy,
            client_first_name: first,
            client_last_name: last,
            client_email: email,
            client_phone: phone,
            days_until_expiration: days,
            urgency: RenewalUrgency::classify(days),
        }
    }

    /// Returns true if the renewal is within the urgent threshold.
    #[must_use]
    pub const fn is_urgent(&self) -> bool {
        self.days_until_expiration >= 0 && self.days_until_expiration <= URGENT_DAYS
    }
}

/// An open activity for the dashboard, with client and policy context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingActivity {
    /// The activity.
    #[serde(flatten)]
    pub activity: Activity,
    /// "First Last" of the linked client.
    pub client_name: Option<String>,
    /// Number of the linked policy.
    pub policy_number: Option<String>,
    /// Carrier of the linked policy.
    pub carrier: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{PolicyStatus, PolicyType};
    use chrono::Utc;
    use uuid::Uuid;

    fn policy_expiring(expiration: NaiveDate) -> Policy {
        let now = Utc::now();
        Policy {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            carrier: "Progressive".to_string(),
            policy_number: "POL-XYZ".to_string(),
            policy_type: PolicyType::Auto,
            effective_date: expiration - chrono::Duration::days(365),
            expiration_date: expiration,
            premium: Decimal::new(120_000, 2),
            details: serde_json::json!({}),
            status: PolicyStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_renewal_item_flattens_client() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4(),
            first_name: "Emily".to_string(),
            last_name: "Davis".to_string(),
            email: Some("emily.davis@email.com".to_string()),
            phone: Some("(512) 555-0104".to_string()),
            address: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };

        let item = RenewalItem::new(
            policy_expiring(NaiveDate::from_ymd_opt(2026, 10, 21).unwrap()),
            Some(client),
            today,
        );

        assert_eq!(item.days_until_expiration, 5);
        assert_eq!(item.urgency, RenewalUrgency::Urgent);
        assert!(item.is_urgent());

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["client_first_name"], "Emily");
        assert_eq!(json["client_phone"], "(512) 555-0104");
        assert_eq!(json["policy_number"], "POL-XYZ");
        assert_eq!(json["urgency"], "urgent");
    }

    #[test]
    fn test_renewal_item_without_client() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let item = RenewalItem::new(
            policy_expiring(NaiveDate::from_ymd_opt(2026, 11, 5).unwrap()),
            None,
            today,
        );

        assert_eq!(item.days_until_expiration, 20);
        assert_eq!(item.urgency, RenewalUrgency::Upcoming);
        assert!(!item.is_urgent());
        assert!(item.client_first_name.is_none());
    }
}
