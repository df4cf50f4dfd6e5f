//! Client repository for database operations.

use brokerdesk_core::client::{
    Client, ClientChanges, ClientDetail, ClientSummary, NewClient, email_key, normalize_optional,
};
use brokerdesk_core::listing::{ClientSort, Sort};
use brokerdesk_core::search::like_pattern;
use brokerdesk_shared::types::PageRequest;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use super::query::{any_ilike, order};
use crate::entities::{client_summary, clients, policies};

/// Error types for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Client not found in the agency.
    #[error("Client not found: {0}")]
    NotFound(Uuid),

    /// Another client in the agency already uses this email.
    #[error("A client with email '{0}' already exists")]
    DuplicateEmail(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filters for listing clients.
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    /// Free-text match against name, email and phone.
    pub search: Option<String>,
}

/// Client repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    db: DatabaseConnection,
}

impl ClientRepository {
    /// Creates a new client repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists clients with their policy aggregates.
    ///
    /// Returns the requested page and the total number of matching clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        agency_id: Uuid,
        filter: &ClientFilter,
        page: PageRequest,
        sort: Sort<ClientSort>,
    ) -> Result<(Vec<ClientSummary>, u64), DbErr> {
        let mut query = client_summary::Entity::find()
            .filter(client_summary::Column::AgencyId.eq(agency_id));

        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            query = query.filter(any_ilike(
                &[
                    client_summary::Column::FirstName,
                    client_summary::Column::LastName,
                    client_summary::Column::Email,
                    client_summary::Column::Phone,
                ],
                &like_pattern(term),
            ));
        }

        let total = query.clone().count(&self.db).await?;
        let page = page.normalized();

        let rows = query
            .order_by(sort_column(sort.field), order(sort.order))
            .order_by_asc(client_summary::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await?;

        Ok((rows.into_iter().map(ClientSummary::from).collect(), total))
    }

    /// Finds a client by ID within the agency.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid, agency_id: Uuid) -> Result<Option<Client>, DbErr> {
        Ok(self.find_model(id, agency_id).await?.map(Client::from))
    }

    /// Finds a client together with its policies, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_detail(
        &self,
        id: Uuid,
        agency_id: Uuid,
    ) -> Result<Option<ClientDetail>, DbErr> {
        let Some(client) = self.find_model(id, agency_id).await? else {
            return Ok(None);
        };

        let policies = policies::Entity::find()
            .filter(policies::Column::AgencyId.eq(agency_id))
            .filter(policies::Column::ClientId.eq(id))
            .order_by_desc(policies::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(Some(ClientDetail {
            client: client.into(),
            policies: policies.into_iter().map(Into::into).collect(),
        }))
    }

    /// Returns true if the email is used by another client in the agency.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_taken(
        &self,
        agency_id: Uuid,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, DbErr> {
        let mut query = clients::Entity::find()
            .filter(clients::Column::AgencyId.eq(agency_id))
            .filter(
                Expr::expr(Func::lower(Expr::col(clients::Column::Email))).eq(email_key(email)),
            );

        if let Some(id) = exclude {
            query = query.filter(clients::Column::Id.ne(id));
        }

        Ok(query.count(&self.db).await? > 0)
    }

    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is taken or the insert fails.
    pub async fn create(&self, agency_id: Uuid, input: NewClient) -> Result<Client, ClientError> {
        let email = normalize_optional(input.email);

        if let Some(email) = &email
            && self.email_taken(agency_id, email, None).await?
        {
            return Err(ClientError::DuplicateEmail(email.clone()));
        }

        let now = Utc::now().into();
        let model = clients::ActiveModel {
            id: Set(Uuid::new_v4()),
            agency_id: Set(agency_id),
            first_name: Set(input.first_name.trim().to_string()),
            last_name: Set(input.last_name.trim().to_string()),
            email: Set(email.clone()),
            phone: Set(normalize_optional(input.phone)),
            address: Set(normalize_optional(input.address)),
            notes: Set(normalize_optional(input.notes)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = model
            .insert(&self.db)
            .await
            .map_err(|e| duplicate_email(e, email.as_deref()))?;

        Ok(model.into())
    }

    /// Applies a partial update to a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the client does not exist, the new email is
    /// taken, or the update fails.
    pub async fn update(
        &self,
        id: Uuid,
        agency_id: Uuid,
        changes: ClientChanges,
    ) -> Result<Client, ClientError> {
        let existing = self
            .find_model(id, agency_id)
            .await?
            .ok_or(ClientError::NotFound(id))?;

        let email = changes.email.map(normalize_optional);
        if let Some(Some(email)) = &email
            && self.email_taken(agency_id, email, Some(id)).await?
        {
            return Err(ClientError::DuplicateEmail(email.clone()));
        }

        let mut model: clients::ActiveModel = existing.into();

        if let Some(first_name) = changes.first_name {
            model.first_name = Set(first_name.trim().to_string());
        }
        if let Some(last_name) = changes.last_name {
            model.last_name = Set(last_name.trim().to_string());
        }
        if let Some(email) = email.clone() {
            model.email = Set(email);
        }
        if let Some(phone) = changes.phone {
            model.phone = Set(normalize_optional(phone));
        }
        if let Some(address) = changes.address {
            model.address = Set(normalize_optional(address));
        }
        if let Some(notes) = changes.notes {
            model.notes = Set(normalize_optional(notes));
        }
        model.updated_at = Set(Utc::now().into());

        let model = model
            .update(&self.db)
            .await
            .map_err(|e| duplicate_email(e, email.flatten().as_deref()))?;

        Ok(model.into())
    }

    /// Deletes a client. Policies, notes, activities and documents linked
    /// to it go with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the client does not exist or the delete fails.
    pub async fn delete(&self, id: Uuid, agency_id: Uuid) -> Result<(), ClientError> {
        let result = clients::Entity::delete_many()
            .filter(clients::Column::Id.eq(id))
            .filter(clients::Column::AgencyId.eq(agency_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ClientError::NotFound(id));
        }

        Ok(())
    }

    async fn find_model(&self, id: Uuid, agency_id: Uuid) -> Result<Option<clients::Model>, DbErr> {
        clients::Entity::find_by_id(id)
            .filter(clients::Column::AgencyId.eq(agency_id))
            .one(&self.db)
            .await
    }
}

const fn sort_column(field: ClientSort) -> client_summary::Column {
    match field {
        ClientSort::CreatedAt => client_summary::Column::CreatedAt,
        ClientSort::FirstName => client_summary::Column::FirstName,
        ClientSort::LastName => client_summary::Column::LastName,
        ClientSort::Email => client_summary::Column::Email,
        ClientSort::PolicyCount => client_summary::Column::PolicyCount,
        ClientSort::TotalPremium => client_summary::Column::TotalPremium,
    }
}

/// Maps a unique-index violation on email to `DuplicateEmail`.
fn duplicate_email(err: DbErr, email: Option<&str>) -> ClientError {
    match (err.sql_err(), email) {
        (Some(SqlErr::UniqueConstraintViolation(_)), Some(email)) => {
            ClientError::DuplicateEmail(email.to_string())
        }
        _ => ClientError::Database(err),
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
