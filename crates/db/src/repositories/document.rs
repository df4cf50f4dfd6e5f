//! Document repository for database operations.
//!
//! Implements the core document repository trait using SeaORM, plus the
//! list query used by the documents endpoint.

use brokerdesk_core::document::{
    Document, DocumentError, DocumentRepository as DocumentRepoTrait, NewDocument,
};
use brokerdesk_core::links::PolicyRef;
use brokerdesk_core::listing::{DocumentSort, Sort};
use brokerdesk_shared::types::PageRequest;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use super::query::{client_exists, order, policy_ref};
use crate::entities::documents;

/// Filters for listing documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentFilter {
    /// Only documents of this client.
    pub client_id: Option<Uuid>,
    /// Only documents of this policy.
    pub policy_id: Option<Uuid>,
}

/// Document repository implementation.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
}

impl DocumentRepository {
    /// Create a new document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists document records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        agency_id: Uuid,
        filter: DocumentFilter,
        page: PageRequest,
        sort: Sort<DocumentSort>,
    ) -> Result<(Vec<Document>, u64), DbErr> {
        let mut query =
            documents::Entity::find().filter(documents::Column::AgencyId.eq(agency_id));

        if let Some(client_id) = filter.client_id {
            query = query.filter(documents::Column::ClientId.eq(client_id));
        }
        if let Some(policy_id) = filter.policy_id {
            query = query.filter(documents::Column::PolicyId.eq(policy_id));
        }

        let total = query.clone().count(&self.db).await?;
        let page = page.normalized();

        let column = match sort.field {
            DocumentSort::UploadedAt => documents::Column::UploadedAt,
            DocumentSort::FileName => documents::Column::FileName,
            DocumentSort::FileSize => documents::Column::FileSize,
        };

        let models = query
            .order_by(column, order(sort.order))
            .order_by_asc(documents::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await?;

        Ok((models.into_iter().map(Document::from).collect(), total))
    }
}

impl DocumentRepoTrait for DocumentRepository {
    async fn create(&self, agency_id: Uuid, input: NewDocument) -> Result<Document, DocumentError> {
        let taken = documents::Entity::find()
            .filter(documents::Column::FilePath.eq(input.file_path.as_str()))
            .count(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;
        if taken > 0 {
            return Err(DocumentError::DuplicatePath(input.file_path));
        }

        let path = input.file_path.clone();
        let active_model = documents::ActiveModel {
            id: Set(Uuid::new_v4()),
            agency_id: Set(agency_id),
            client_id: Set(input.client_id),
            policy_id: Set(input.policy_id),
            file_name: Set(input.file_name),
            file_path: Set(input.file_path),
            file_size: Set(input.file_size),
            mime_type: Set(input.mime_type),
            uploaded_at: Set(Utc::now().into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| duplicate_path(&e, path))?;

        Ok(model.into())
    }

    async fn find_by_id(
        &self,
        id: Uuid,
        agency_id: Uuid,
    ) -> Result<Option<Document>, DocumentError> {
        let model = documents::Entity::find_by_id(id)
            .filter(documents::Column::AgencyId.eq(agency_id))
            .one(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        Ok(model.map(Document::from))
    }

    async fn delete(&self, id: Uuid, agency_id: Uuid) -> Result<bool, DocumentError> {
        let result = documents::Entity::delete_many()
            .filter(documents::Column::Id.eq(id))
            .filter(documents::Column::AgencyId.eq(agency_id))
            .exec(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    async fn client_exists(&self, client_id: Uuid, agency_id: Uuid) -> Result<bool, DocumentError> {
        client_exists(&self.db, client_id, agency_id)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))
    }

    async fn find_policy(
        &self,
        policy_id: Uuid,
        agency_id: Uuid,
    ) -> Result<Option<PolicyRef>, DocumentError> {
        policy_ref(&self.db, policy_id, agency_id)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))
    }
}

/// Maps a unique-index violation on `file_path` to `DuplicatePath`.
fn duplicate_path(err: &DbErr, path: String) -> DocumentError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DocumentError::DuplicatePath(path),
        _ => DocumentError::repository(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fixtures::{count_row, document_model, exec_result, mock_db};

    #[tokio::test]
    async fn test_find_by_id_scoped() {
        let agency_id = Uuid::new_v4();
        let model = document_model(agency_id, None);
        let repo = DocumentRepository::new(
            mock_db()
                .append_query_results([vec![model.clone()]])
                .into_connection(),
        );

        let document = repo
            .find_by_id(model.id, agency_id)
            .await
            .unwrap()
            .expect("document exists");
        assert_eq!(document.file_path, model.file_path);
    }

    #[tokio::test]
    async fn test_delete_reports_missing_row() {
        let repo = DocumentRepository::new(
            mock_db()
                .append_exec_results([exec_result(0)])
                .into_connection(),
        );

        let deleted = repo.delete(Uuid::new_v4(), Uuid::new_v4()).await.unwrap();
        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_list_returns_total() {
        let agency_id = Uuid::new_v4();
        let client_id = Some(Uuid::new_v4());
        let first = document_model(agency_id, client_id);
        let second = document_model(agency_id, client_id);
        let repo = DocumentRepository::new(
            mock_db()
                .append_query_results([vec![count_row(7)]])
                .append_query_results([vec![first.clone(), second.clone()]])
                .into_connection(),
        );

        let (documents, total) = repo
            .list(
                agency_id,
                DocumentFilter {
                    client_id,
                    policy_id: None,
                },
                PageRequest::from_query(Some(2), Some(2)),
                Sort::default(),
            )
            .await
            .unwrap();

        assert_eq!(total, 7);
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].id, first.id);
    }

    #[tokio::test]
    async fn test_create_rejects_registered_path() {
        let agency_id = Uuid::new_v4();
        let repo = DocumentRepository::new(
            mock_db()
                .append_query_results([vec![count_row(1)]])
                .into_connection(),
        );
        let input = NewDocument {
            client_id: None,
            policy_id: None,
            file_name: "a.txt".to_string(),
            file_path: format!("{agency_id}/general/1-a.txt"),
            file_size: Some(12),
            mime_type: Some("text/plain".to_string()),
        };

        let Err(DocumentError::DuplicatePath(path)) = repo.create(agency_id, input).await else {
            panic!("expected a duplicate path error");
        };
        assert_eq!(path, format!("{agency_id}/general/1-a.txt"));
    }

    #[tokio::test]
    async fn test_create_inserts_when_path_free() {
        let agency_id = Uuid::new_v4();
        let model = document_model(agency_id, None);
        let repo = DocumentRepository::new(
            mock_db()
                .append_query_results([vec![count_row(0)]])
                .append_query_results([vec![model.clone()]])
                .into_connection(),
        );
        let input = NewDocument {
            client_id: None,
            policy_id: None,
            file_name: model.file_name.clone(),
            file_path: model.file_path.clone(),
            file_size: model.file_size,
            mime_type: model.mime_type.clone(),
        };

        let document = repo.create(agency_id, input).await.unwrap();
        assert_eq!(document.id, model.id);
    }

    #[tokio::test]
    async fn test_database_errors_become_repository_errors() {
        // No query results queued: the mock fails the lookup.
        let repo = DocumentRepository::new(mock_db().into_connection());

        let result = repo.client_exists(Uuid::new_v4(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(DocumentError::Repository(_))));
    }
}
