//! Activity repository for database operations.

use brokerdesk_core::activity::{
    self as domain, Activity, ActivityChanges, ActivityWithClient, CompletionChange, NewActivity,
};
use brokerdesk_core::client::Client;
use brokerdesk_core::links::{LinkError, RecordLinks, resolve_links};
use brokerdesk_core::listing::{ActivitySort, Sort};
use brokerdesk_shared::types::PageRequest;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::NullOrdering;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::query::{client_exists, order, policy_ref};
use crate::entities::{activities, clients, sea_orm_active_enums::ActivityType};

/// Error types for activity operations.
#[derive(Debug, thiserror::Error)]
pub enum ActivityError {
    /// Activity not found in the agency.
    #[error("Activity not found: {0}")]
    NotFound(Uuid),

    /// Linked client not found in the agency.
    #[error("Client not found: {0}")]
    ClientNotFound(Uuid),

    /// Linked policy not found in the agency.
    #[error("Policy not found: {0}")]
    PolicyNotFound(Uuid),

    /// Linked policy belongs to another client.
    #[error(transparent)]
    Link(#[from] LinkError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filters for listing activities.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityFilter {
    /// Only activities of this client.
    pub client_id: Option<Uuid>,
    /// Only activities of this policy.
    pub policy_id: Option<Uuid>,
    /// Only activities of this kind.
    pub activity_type: Option<domain::ActivityType>,
    /// Only completed (or open) activities.
    pub completed: Option<bool>,
}

/// Activity repository for CRUD and follow-up queries.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    db: DatabaseConnection,
}

impl ActivityRepository {
    /// Creates a new activity repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists activities with their client's name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        agency_id: Uuid,
        filter: ActivityFilter,
        page: PageRequest,
        sort: Sort<ActivitySort>,
    ) -> Result<(Vec<ActivityWithClient>, u64), DbErr> {
        let mut query = scoped(agency_id);

        if let Some(client_id) = filter.client_id {
            query = query.filter(activities::Column::ClientId.eq(client_id));
        }
        if let Some(policy_id) = filter.policy_id {
            query = query.filter(activities::Column::PolicyId.eq(policy_id));
        }
        if let Some(activity_type) = filter.activity_type {
            query = query
                .filter(activities::Column::ActivityType.eq(ActivityType::from(activity_type)));
        }
        if let Some(completed) = filter.completed {
            query = query.filter(activities::Column::Completed.eq(completed));
        }

        let total = query.clone().count(&self.db).await?;
        let page = page.normalized();

        let query = match sort.field {
            ActivitySort::DueDate => query.order_by_with_nulls(
                activities::Column::DueDate,
                order(sort.order),
                NullOrdering::Last,
            ),
            ActivitySort::CreatedAt => {
                query.order_by(activities::Column::CreatedAt, order(sort.order))
            }
            ActivitySort::Type => {
                query.order_by(activities::Column::ActivityType, order(sort.order))
            }
            ActivitySort::Completed => {
                query.order_by(activities::Column::Completed, order(sort.order))
            }
        };

        let rows = query
            .order_by_asc(activities::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .find_also_related(clients::Entity)
            .all(&self.db)
            .await?;

        Ok((rows.into_iter().map(with_client).collect(), total))
    }

    /// Open activities due on or before `until`, soonest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn upcoming(
        &self,
        agency_id: Uuid,
        until: DateTime<Utc>,
    ) -> Result<Vec<ActivityWithClient>, DbErr> {
        let rows = scoped(agency_id)
            .filter(activities::Column::Completed.eq(false))
            .filter(activities::Column::DueDate.is_not_null())
            .filter(activities::Column::DueDate.lte(until))
            .order_by_asc(activities::Column::DueDate)
            .order_by_asc(activities::Column::Id)
            .find_also_related(clients::Entity)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(with_client).collect())
    }

    /// Finds an activity by ID within the agency.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: Uuid,
        agency_id: Uuid,
    ) -> Result<Option<ActivityWithClient>, DbErr> {
        let row = scoped(agency_id)
            .filter(activities::Column::Id.eq(id))
            .find_also_related(clients::Entity)
            .one(&self.db)
            .await?;

        Ok(row.map(with_client))
    }

    /// Creates an activity. A linked policy fills in its client.
    ///
    /// # Errors
    ///
    /// Returns an error if a linked record is missing, the links disagree,
    /// or the insert fails.
    pub async fn create(
        &self,
        agency_id: Uuid,
        input: NewActivity,
    ) -> Result<Activity, ActivityError> {
        let links = self
            .resolve(agency_id, input.client_id, input.policy_id)
            .await?;

        let now = Utc::now().into();
        let model = activities::ActiveModel {
            id: Set(Uuid::new_v4()),
            agency_id: Set(agency_id),
            activity_type: Set(input.activity_type.into()),
            description: Set(input.description.trim().to_string()),
            client_id: Set(links.client_id),
            policy_id: Set(links.policy_id),
            due_date: Set(input.due_date.map(Into::into)),
            completed: Set(false),
            completed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(model.insert(&self.db).await?.into())
    }

    /// Applies a partial update. Completing stamps `now`; reopening clears
    /// the completion time.
    ///
    /// # Errors
    ///
    /// Returns an error if the activity does not exist or the update fails.
    pub async fn update(
        &self,
        id: Uuid,
        agency_id: Uuid,
        changes: ActivityChanges,
        now: DateTime<Utc>,
    ) -> Result<Activity, ActivityError> {
        let existing = activities::Entity::find_by_id(id)
            .filter(activities::Column::AgencyId.eq(agency_id))
            .one(&self.db)
            .await?
            .ok_or(ActivityError::NotFound(id))?;

        let mut model: activities::ActiveModel = existing.into();

        if let Some(activity_type) = changes.activity_type {
            model.activity_type = Set(activity_type.into());
        }
        if let Some(description) = changes.description {
            model.description = Set(description.trim().to_string());
        }
        if let Some(due_date) = changes.due_date {
            model.due_date = Set(due_date.map(Into::into));
        }
        if let Some((completed, completed_at)) =
            CompletionChange::from_request(changes.completed, now).columns()
        {
            model.completed = Set(completed);
            model.completed_at = Set(completed_at.map(Into::into));
        }
        model.updated_at = Set(now.into());

        Ok(model.update(&self.db).await?.into())
    }

    /// Deletes an activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the activity does not exist or the delete fails.
    pub async fn delete(&self, id: Uuid, agency_id: Uuid) -> Result<(), ActivityError> {
        let result = activities::Entity::delete_many()
            .filter(activities::Column::Id.eq(id))
            .filter(activities::Column::AgencyId.eq(agency_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ActivityError::NotFound(id));
        }

        Ok(())
    }

    async fn resolve(
        &self,
        agency_id: Uuid,
        client_id: Option<Uuid>,
        policy_id: Option<Uuid>,
    ) -> Result<RecordLinks, ActivityError> {
        if let Some(client_id) = client_id
            && !client_exists(&self.db, client_id, agency_id).await?
        {
            return Err(ActivityError::ClientNotFound(client_id));
        }

        let policy = match policy_id {
            Some(policy_id) => Some(
                policy_ref(&self.db, policy_id, agency_id)
                    .await?
                    .ok_or(ActivityError::PolicyNotFound(policy_id))?,
            ),
            None => None,
        };

        Ok(resolve_links(client_id, policy)?)
    }
}

fn scoped(agency_id: Uuid) -> Select<activities::Entity> {
    activities::Entity::find().filter(activities::Column::AgencyId.eq(agency_id))
}

/// Pairs an activity row with its client's display name.
pub(crate) fn with_client(
    (activity, client): (activities::Model, Option<clients::Model>),
) -> ActivityWithClient {
    ActivityWithClient {
        client_name: client.map(|c| Client::from(c).full_name()),
        activity: activity.into(),
    }
}

#[cfg(test)]
#[path = "activity_tests.rs"]
mod tests;
