//! Global search across clients, policies and activities.

use brokerdesk_core::client::Client;
use brokerdesk_core::search::{SearchQuery, SearchResults, merge_unique};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use super::query::any_ilike;
use super::{activity, policy};
use crate::entities::{activities, clients, policies};

/// Search repository.
#[derive(Debug, Clone)]
pub struct SearchRepository {
    db: DatabaseConnection,
}

impl SearchRepository {
    /// Creates a new search repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Runs the query against every searchable record type.
    ///
    /// Policies match on their own number and carrier first, then on the
    /// owning client's name; duplicates keep the first match.
    ///
    /// # Errors
    ///
    /// Returns an error if any database query fails.
    pub async fn search(
        &self,
        agency_id: Uuid,
        query: &SearchQuery,
    ) -> Result<SearchResults, DbErr> {
        let pattern = query.like_pattern();
        let limit = query.limit();

        let (clients, by_field, by_owner, activities) = tokio::try_join!(
            clients::Entity::find()
                .filter(clients::Column::AgencyId.eq(agency_id))
                .filter(any_ilike(
                    &[
                        clients::Column::FirstName,
                        clients::Column::LastName,
                        clients::Column::Email,
                        clients::Column::Phone,
                    ],
                    &pattern,
                ))
                .order_by_asc(clients::Column::LastName)
                .order_by_asc(clients::Column::FirstName)
                .limit(limit)
                .all(&self.db),
            policies::Entity::find()
                .filter(policies::Column::AgencyId.eq(agency_id))
                .filter(any_ilike(
                    &[policies::Column::PolicyNumber, policies::Column::Carrier],
                    &pattern,
                ))
                .order_by_asc(policies::Column::ExpirationDate)
                .limit(limit)
                .find_also_related(clients::Entity)
                .all(&self.db),
            policies::Entity::find()
                .filter(policies::Column::AgencyId.eq(agency_id))
                .find_also_related(clients::Entity)
                .filter(any_ilike(
                    &[clients::Column::FirstName, clients::Column::LastName],
                    &pattern,
                ))
                .order_by_asc(policies::Column::ExpirationDate)
                .limit(limit)
                .all(&self.db),
            activities::Entity::find()
                .filter(activities::Column::AgencyId.eq(agency_id))
                .filter(any_ilike(&[activities::Column::Description], &pattern))
                .order_by_desc(activities::Column::CreatedAt)
                .limit(limit)
                .find_also_related(clients::Entity)
                .all(&self.db),
        )?;

        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(SearchResults {
            clients: clients.into_iter().map(Client::from).collect(),
            policies: merge_unique(
                by_field.into_iter().map(policy::with_client).collect(),
                by_owner.into_iter().map(policy::with_client).collect(),
                limit,
            ),
            activities: activities.into_iter().map(activity::with_client).collect(),
        })
    }
}
