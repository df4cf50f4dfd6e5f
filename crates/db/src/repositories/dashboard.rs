//! Dashboard repository for headline metrics, renewals and open follow-ups.

use std::collections::HashMap;

use brokerdesk_core::dashboard::{DashboardStats, RenewalItem, UpcomingActivity};
use brokerdesk_core::renewal::{RenewalWindow, URGENT_DAYS};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Condition, NullOrdering};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use super::activity::with_client;
use super::policy::PolicyRepository;
use crate::entities::{activities, clients, policies, sea_orm_active_enums::PolicyStatus};

/// Dashboard repository.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Headline counts for the agency as seen on `today`.
    ///
    /// The individual counts run concurrently.
    ///
    /// # Errors
    ///
    /// Returns an error if any database query fails.
    pub async fn stats(&self, agency_id: Uuid, today: NaiveDate) -> Result<DashboardStats, DbErr> {
        let window_end = RenewalWindow::default().end_date(today);
        let urgent_end = today + Duration::days(URGENT_DAYS);

        let (
            total_clients,
            total_policies,
            active_policies,
            pending_activities,
            total_premium,
            expiring_soon,
            urgent_renewals,
        ) = tokio::try_join!(
            clients::Entity::find()
                .filter(clients::Column::AgencyId.eq(agency_id))
                .count(&self.db),
            policies::Entity::find()
                .filter(policies::Column::AgencyId.eq(agency_id))
                .count(&self.db),
            active_policies(agency_id).count(&self.db),
            activities::Entity::find()
                .filter(activities::Column::AgencyId.eq(agency_id))
                .filter(activities::Column::Completed.eq(false))
                .count(&self.db),
            self.active_premium(agency_id),
            active_policies(agency_id)
                .filter(policies::Column::ExpirationDate.between(today, window_end))
                .count(&self.db),
            active_policies(agency_id)
                .filter(policies::Column::ExpirationDate.between(today, urgent_end))
                .count(&self.db),
        )?;

        Ok(DashboardStats {
            total_clients,
            total_policies,
            active_policies,
            pending_activities,
            total_premium,
            expiring_soon,
            urgent_renewals,
        })
    }

    /// Active policies inside the renewal window, soonest first, with
    /// client contact details.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn renewals(
        &self,
        agency_id: Uuid,
        today: NaiveDate,
        window: RenewalWindow,
    ) -> Result<Vec<RenewalItem>, DbErr> {
        let rows = PolicyRepository::new(self.db.clone())
            .expiring_with_clients(agency_id, today, window.end_date(today))
            .await?;

        Ok(rows
            .into_iter()
            .map(|(policy, client)| RenewalItem::new(policy, client, today))
            .collect())
    }

    /// Open activities that are undated or due by `until`, soonest first
    /// with undated ones last.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn upcoming_activities(
        &self,
        agency_id: Uuid,
        until: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<UpcomingActivity>, DbErr> {
        let rows = activities::Entity::find()
            .filter(activities::Column::AgencyId.eq(agency_id))
            .filter(activities::Column::Completed.eq(false))
            .filter(
                Condition::any()
                    .add(activities::Column::DueDate.is_null())
                    .add(activities::Column::DueDate.lte(until)),
            )
            .order_by_with_nulls(activities::Column::DueDate, Order::Asc, NullOrdering::Last)
            .order_by_asc(activities::Column::Id)
            .limit(limit)
            .find_also_related(clients::Entity)
            .all(&self.db)
            .await?;

        let policy_ids: Vec<Uuid> = rows.iter().filter_map(|(a, _)| a.policy_id).collect();
        let policies: HashMap<Uuid, policies::Model> = if policy_ids.is_empty() {
            HashMap::new()
        } else {
            policies::Entity::find()
                .filter(policies::Column::AgencyId.eq(agency_id))
                .filter(policies::Column::Id.is_in(policy_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|p| (p.id, p))
                .collect()
        };

        Ok(rows
            .into_iter()
            .map(|row| {
                let activity = with_client(row);
                let policy = activity
                    .activity
                    .policy_id
                    .and_then(|id| policies.get(&id));

                UpcomingActivity {
                    policy_number: policy.map(|p| p.policy_number.clone()),
                    carrier: policy.map(|p| p.carrier.clone()),
                    client_name: activity.client_name,
                    activity: activity.activity,
                }
            })
            .collect())
    }

    /// Sum of premiums over active policies.
    async fn active_premium(&self, agency_id: Uuid) -> Result<Decimal, DbErr> {
        let total: Option<Option<Decimal>> = active_policies(agency_id)
            .select_only()
            .column_as(policies::Column::Premium.sum(), "total_premium")
            .into_tuple()
            .one(&self.db)
            .await?;

        Ok(total.flatten().unwrap_or(Decimal::ZERO))
    }
}

fn active_policies(agency_id: Uuid) -> sea_orm::Select<policies::Entity> {
    policies::Entity::find()
        .filter(policies::Column::AgencyId.eq(agency_id))
        .filter(policies::Column::Status.eq(PolicyStatus::Active))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fixtures::{
        activity_model, client_model, count_row, date, mock_db, policy_model,
    };
    use brokerdesk_core::renewal::RenewalUrgency;
    use rust_decimal_macros::dec;
    use sea_orm::Value;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_renewals_classify_days() {
        let agency_id = Uuid::new_v4();
        let today = date(2026, 10, 16);
        let client = client_model(agency_id, "Maria", "Garcia");
        let urgent = policy_model(agency_id, client.id, date(2026, 10, 20));
        let upcoming = policy_model(agency_id, client.id, date(2026, 11, 5));

        let repo = DashboardRepository::new(
            mock_db()
                .append_query_results([vec![
                    (urgent.clone(), client.clone()),
                    (upcoming.clone(), client),
                ]])
                .into_connection(),
        );

        let items = repo
            .renewals(agency_id, today, RenewalWindow::default())
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].days_until_expiration, 4);
        assert_eq!(items[0].urgency, RenewalUrgency::Urgent);
        assert_eq!(items[0].client_first_name.as_deref(), Some("Maria"));
        assert_eq!(items[1].days_until_expiration, 20);
        assert_eq!(items[1].urgency, RenewalUrgency::Upcoming);
    }

    #[tokio::test]
    async fn test_upcoming_activities_attach_policy() {
        let agency_id = Uuid::new_v4();
        let client = client_model(agency_id, "James", "Wilson");
        let policy = policy_model(agency_id, client.id, date(2027, 1, 1));
        let linked = activity_model(agency_id, Some(client.id), Some(policy.id));
        let mut undated = activity_model(agency_id, Some(client.id), None);
        undated.due_date = None;

        let repo = DashboardRepository::new(
            mock_db()
                .append_query_results([vec![
                    (linked.clone(), client.clone()),
                    (undated.clone(), client),
                ]])
                .append_query_results([vec![policy.clone()]])
                .into_connection(),
        );

        let items = repo
            .upcoming_activities(agency_id, Utc::now() + Duration::days(7), 10)
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].policy_number.as_deref(), Some("AUT-1001"));
        assert_eq!(items[0].carrier.as_deref(), Some("Acme Mutual"));
        assert_eq!(items[0].client_name.as_deref(), Some("James Wilson"));
        assert_eq!(items[1].activity.id, undated.id);
        assert_eq!(items[1].policy_number, None);
    }

    #[tokio::test]
    async fn test_active_premium_defaults_to_zero() {
        let row = BTreeMap::from([(
            "total_premium".to_string(),
            Value::Decimal(None),
        )]);
        let repo = DashboardRepository::new(
            mock_db().append_query_results([vec![row]]).into_connection(),
        );

        let total = repo.active_premium(Uuid::new_v4()).await.unwrap();
        assert_eq!(total, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_active_premium_sums() {
        let row = BTreeMap::from([(
            "total_premium".to_string(),
            Value::Decimal(Some(Box::new(dec!(4321.50)))),
        )]);
        let repo = DashboardRepository::new(
            mock_db().append_query_results([vec![row]]).into_connection(),
        );

        let total = repo.active_premium(Uuid::new_v4()).await.unwrap();
        assert_eq!(total, dec!(4321.50));
    }

    #[tokio::test]
    async fn test_stats_counts() {
        // try_join! polls the futures in declaration order, so the mock
        // results line up with the fields.
        let premium = BTreeMap::from([(
            "total_premium".to_string(),
            Value::Decimal(Some(Box::new(dec!(1000)))),
        )]);
        let repo = DashboardRepository::new(
            mock_db()
                .append_query_results([vec![count_row(12)]])
                .append_query_results([vec![count_row(24)]])
                .append_query_results([vec![count_row(18)]])
                .append_query_results([vec![count_row(9)]])
                .append_query_results([vec![premium]])
                .append_query_results([vec![count_row(5)]])
                .append_query_results([vec![count_row(2)]])
                .into_connection(),
        );

        let stats = repo.stats(Uuid::new_v4(), date(2026, 10, 16)).await.unwrap();

        assert_eq!(stats.total_clients, 12);
        assert_eq!(stats.total_policies, 24);
        assert_eq!(stats.active_policies, 18);
        assert_eq!(stats.pending_activities, 9);
        assert_eq!(stats.total_premium, dec!(1000));
        assert_eq!(stats.expiring_soon, 5);
        assert_eq!(stats.urgent_renewals, 2);
    }
}
