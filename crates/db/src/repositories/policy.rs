//! Policy repository for database operations.

use brokerdesk_core::client::Client;
use brokerdesk_core::listing::{PolicySort, Sort};
use brokerdesk_core::policy::{
    self as domain, NewPolicy, Policy, PolicyChanges, PolicyWithClient, validate_changes,
    validate_new_policy,
};
use brokerdesk_shared::types::PageRequest;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::query::{client_exists, order};
use crate::entities::{
    clients, policies,
    sea_orm_active_enums::{PolicyStatus, PolicyType},
};

/// Error types for policy operations.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// Policy not found in the agency.
    #[error("Policy not found: {0}")]
    NotFound(Uuid),

    /// Owning client not found in the agency.
    #[error("Client not found: {0}")]
    ClientNotFound(Uuid),

    /// Term, premium or details rejected.
    #[error(transparent)]
    Invalid(#[from] domain::PolicyError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filters for listing policies.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyFilter {
    /// Only policies of this client.
    pub client_id: Option<Uuid>,
    /// Only policies in this status.
    pub status: Option<domain::PolicyStatus>,
    /// Only policies of this line.
    pub policy_type: Option<domain::PolicyType>,
}

/// Policy repository for CRUD and renewal queries.
#[derive(Debug, Clone)]
pub struct PolicyRepository {
    db: DatabaseConnection,
}

impl PolicyRepository {
    /// Creates a new policy repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists policies with their client's name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        agency_id: Uuid,
        filter: PolicyFilter,
        page: PageRequest,
        sort: Sort<PolicySort>,
    ) -> Result<(Vec<PolicyWithClient>, u64), DbErr> {
        let mut query = scoped(agency_id);

        if let Some(client_id) = filter.client_id {
            query = query.filter(policies::Column::ClientId.eq(client_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(policies::Column::Status.eq(PolicyStatus::from(status)));
        }
        if let Some(policy_type) = filter.policy_type {
            query = query.filter(policies::Column::PolicyType.eq(PolicyType::from(policy_type)));
        }

        let total = query.clone().count(&self.db).await?;
        let page = page.normalized();

        let rows = query
            .order_by(sort_column(sort.field), order(sort.order))
            .order_by_asc(policies::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .find_also_related(clients::Entity)
            .all(&self.db)
            .await?;

        Ok((rows.into_iter().map(with_client).collect(), total))
    }

    /// Active policies expiring between `from` and `until`, inclusive,
    /// soonest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn expiring(
        &self,
        agency_id: Uuid,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<PolicyWithClient>, DbErr> {
        let rows = self.expiring_with_clients(agency_id, from, until).await?;

        Ok(rows
            .into_iter()
            .map(|(policy, client)| PolicyWithClient {
                client_name: client.as_ref().map(Client::full_name),
                policy,
            })
            .collect())
    }

    /// Active policies expiring between `from` and `until` with the full
    /// client record, soonest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn expiring_with_clients(
        &self,
        agency_id: Uuid,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<(Policy, Option<Client>)>, DbErr> {
        let rows = scoped(agency_id)
            .filter(policies::Column::Status.eq(PolicyStatus::Active))
            .filter(policies::Column::ExpirationDate.gte(from))
            .filter(policies::Column::ExpirationDate.lte(until))
            .order_by_asc(policies::Column::ExpirationDate)
            .order_by_asc(policies::Column::Id)
            .find_also_related(clients::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(policy, client)| (policy.into(), client.map(Client::from)))
            .collect())
    }

    /// Finds a policy by ID within the agency.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: Uuid,
        agency_id: Uuid,
    ) -> Result<Option<PolicyWithClient>, DbErr> {
        let row = scoped(agency_id)
            .filter(policies::Column::Id.eq(id))
            .find_also_related(clients::Entity)
            .one(&self.db)
            .await?;

        Ok(row.map(with_client))
    }

    /// Creates a policy for a client of the agency.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid, the client does not exist,
    /// or the insert fails.
    pub async fn create(&self, agency_id: Uuid, input: NewPolicy) -> Result<Policy, PolicyError> {
        validate_new_policy(&input)?;

        if !client_exists(&self.db, input.client_id, agency_id).await? {
            return Err(PolicyError::ClientNotFound(input.client_id));
        }

        let now = Utc::now().into();
        let model = policies::ActiveModel {
            id: Set(Uuid::new_v4()),
            agency_id: Set(agency_id),
            client_id: Set(input.client_id),
            carrier: Set(input.carrier.trim().to_string()),
            policy_number: Set(input.policy_number.trim().to_string()),
            policy_type: Set(input.policy_type.into()),
            effective_date: Set(input.effective_date),
            expiration_date: Set(input.expiration_date),
            premium: Set(input.premium),
            details: Set(input.details),
            status: Set(input.status.into()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(model.insert(&self.db).await?.into())
    }

    /// Applies a partial update. Coverage dates are validated against the
    /// merged record.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy does not exist, the merged record is
    /// invalid, or the update fails.
    pub async fn update(
        &self,
        id: Uuid,
        agency_id: Uuid,
        changes: PolicyChanges,
    ) -> Result<Policy, PolicyError> {
        let existing = policies::Entity::find_by_id(id)
            .filter(policies::Column::AgencyId.eq(agency_id))
            .one(&self.db)
            .await?
            .ok_or(PolicyError::NotFound(id))?;

        let current = Policy::from(existing.clone());
        validate_changes(&current, &changes)?;

        if changes.is_empty() {
            return Ok(current);
        }

        let mut model: policies::ActiveModel = existing.into();

        if let Some(carrier) = changes.carrier {
            model.carrier = Set(carrier.trim().to_string());
        }
        if let Some(policy_number) = changes.policy_number {
            model.policy_number = Set(policy_number.trim().to_string());
        }
        if let Some(policy_type) = changes.policy_type {
            model.policy_type = Set(policy_type.into());
        }
        if let Some(effective_date) = changes.effective_date {
            model.effective_date = Set(effective_date);
        }
        if let Some(expiration_date) = changes.expiration_date {
            model.expiration_date = Set(expiration_date);
        }
        if let Some(premium) = changes.premium {
            model.premium = Set(premium);
        }
        if let Some(details) = changes.details {
            model.details = Set(details);
        }
        if let Some(status) = changes.status {
            model.status = Set(status.into());
        }
        model.updated_at = Set(Utc::now().into());

        Ok(model.update(&self.db).await?.into())
    }

    /// Deletes a policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy does not exist or the delete fails.
    pub async fn delete(&self, id: Uuid, agency_id: Uuid) -> Result<(), PolicyError> {
        let result = policies::Entity::delete_many()
            .filter(policies::Column::Id.eq(id))
            .filter(policies::Column::AgencyId.eq(agency_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(PolicyError::NotFound(id));
        }

        Ok(())
    }
}

fn scoped(agency_id: Uuid) -> Select<policies::Entity> {
    policies::Entity::find().filter(policies::Column::AgencyId.eq(agency_id))
}

/// Pairs a policy row with its client's display name.
pub(crate) fn with_client(
    (policy, client): (policies::Model, Option<clients::Model>),
) -> PolicyWithClient {
    PolicyWithClient {
        client_name: client.map(|c| Client::from(c).full_name()),
        policy: policy.into(),
    }
}

const fn sort_column(field: PolicySort) -> policies::Column {
    match field {
        PolicySort::CreatedAt => policies::Column::CreatedAt,
        PolicySort::ExpirationDate => policies::Column::ExpirationDate,
        PolicySort::EffectiveDate => policies::Column::EffectiveDate,
        PolicySort::Premium => policies::Column::Premium,
        PolicySort::Carrier => policies::Column::Carrier,
        PolicySort::PolicyNumber => policies::Column::PolicyNumber,
        PolicySort::Status => policies::Column::Status,
        PolicySort::Type => policies::Column::PolicyType,
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
