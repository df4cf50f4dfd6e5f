//! Client note repository.

use brokerdesk_core::note::ClientNote;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::query::client_exists;
use crate::entities::client_notes;

/// Error types for note operations.
#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    /// Note not found in the agency.
    #[error("Note not found: {0}")]
    NotFound(Uuid),

    /// Client not found in the agency.
    #[error("Client not found: {0}")]
    ClientNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Repository for notes attached to clients.
#[derive(Debug, Clone)]
pub struct NoteRepository {
    db: DatabaseConnection,
}

impl NoteRepository {
    /// Creates a new note repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Notes for a client, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_client(
        &self,
        client_id: Uuid,
        agency_id: Uuid,
    ) -> Result<Vec<ClientNote>, DbErr> {
        let notes = client_notes::Entity::find()
            .filter(client_notes::Column::AgencyId.eq(agency_id))
            .filter(client_notes::Column::ClientId.eq(client_id))
            .order_by_desc(client_notes::Column::CreatedAt)
            .order_by_desc(client_notes::Column::Id)
            .all(&self.db)
            .await?;

        Ok(notes.into_iter().map(ClientNote::from).collect())
    }

    /// Adds a note to a client. `content` must already be trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the client does not exist or the insert fails.
    pub async fn create(
        &self,
        agency_id: Uuid,
        client_id: Uuid,
        content: String,
    ) -> Result<ClientNote, NoteError> {
        if !client_exists(&self.db, client_id, agency_id).await? {
            return Err(NoteError::ClientNotFound(client_id));
        }

        let now = Utc::now().into();
        let model = client_notes::ActiveModel {
            id: Set(Uuid::new_v4()),
            agency_id: Set(agency_id),
            client_id: Set(client_id),
            content: Set(content),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(model.insert(&self.db).await?.into())
    }

    /// Replaces the content of a note.
    ///
    /// # Errors
    ///
    /// Returns an error if the note does not exist or the update fails.
    pub async fn update(
        &self,
        id: Uuid,
        agency_id: Uuid,
        content: String,
    ) -> Result<ClientNote, NoteError> {
        let existing = client_notes::Entity::find_by_id(id)
            .filter(client_notes::Column::AgencyId.eq(agency_id))
            .one(&self.db)
            .await?
            .ok_or(NoteError::NotFound(id))?;

        let mut model: client_notes::ActiveModel = existing.into();
        model.content = Set(content);
        model.updated_at = Set(Utc::now().into());

        Ok(model.update(&self.db).await?.into())
    }

    /// Deletes a note.
    ///
    /// # Errors
    ///
    /// Returns an error if the note does not exist or the delete fails.
    pub async fn delete(&self, id: Uuid, agency_id: Uuid) -> Result<(), NoteError> {
        let result = client_notes::Entity::delete_many()
            .filter(client_notes::Column::Id.eq(id))
            .filter(client_notes::Column::AgencyId.eq(agency_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(NoteError::NotFound(id));
        }

        Ok(())
    }
}
