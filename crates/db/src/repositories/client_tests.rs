//! Unit tests for the client repository against a mock database.

use brokerdesk_core::client::{ClientChanges, NewClient};
use sea_orm::MockDatabase;
use uuid::Uuid;

use super::*;
use crate::repositories::fixtures::{
    client_model, count_row, date, exec_result, mock_db, policy_model,
};

fn repo(db: MockDatabase) -> ClientRepository {
    ClientRepository::new(db.into_connection())
}

#[tokio::test]
async fn test_find_by_id_converts_model() {
    let agency_id = Uuid::new_v4();
    let model = client_model(agency_id, "Maria", "Garcia");
    let repo = repo(mock_db().append_query_results([vec![model.clone()]]));

    let client = repo
        .find_by_id(model.id, agency_id)
        .await
        .unwrap()
        .expect("client exists");

    assert_eq!(client.id, model.id);
    assert_eq!(client.full_name(), "Maria Garcia");
}

#[tokio::test]
async fn test_find_detail_missing_client() {
    let repo = repo(mock_db().append_query_results([Vec::<clients::Model>::new()]));

    let detail = repo.find_detail(Uuid::new_v4(), Uuid::new_v4()).await.unwrap();
    assert!(detail.is_none());
}

#[tokio::test]
async fn test_find_detail_includes_policies() {
    let agency_id = Uuid::new_v4();
    let client = client_model(agency_id, "James", "Wilson");
    let newer = policy_model(agency_id, client.id, date(2027, 3, 1));
    let older = policy_model(agency_id, client.id, date(2026, 12, 1));

    let repo = repo(
        mock_db()
            .append_query_results([vec![client.clone()]])
            .append_query_results([vec![newer.clone(), older.clone()]]),
    );

    let detail = repo
        .find_detail(client.id, agency_id)
        .await
        .unwrap()
        .expect("client exists");

    assert_eq!(detail.client.id, client.id);
    let ids: Vec<_> = detail.policies.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
}

#[tokio::test]
async fn test_create_rejects_duplicate_email() {
    let repo = repo(mock_db().append_query_results([vec![count_row(1)]]));

    let result = repo
        .create(
            Uuid::new_v4(),
            NewClient {
                first_name: "Maria".to_string(),
                last_name: "Garcia".to_string(),
                email: Some("  Maria@Example.com ".to_string()),
                ..NewClient::default()
            },
        )
        .await;

    match result {
        Err(ClientError::DuplicateEmail(email)) => assert_eq!(email, "Maria@Example.com"),
        other => panic!("expected duplicate email, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_inserts_when_email_free() {
    let agency_id = Uuid::new_v4();
    let stored = client_model(agency_id, "Maria", "Garcia");
    let repo = repo(
        mock_db()
            .append_query_results([vec![count_row(0)]])
            .append_query_results([vec![stored.clone()]]),
    );

    let client = repo
        .create(
            agency_id,
            NewClient {
                first_name: "Maria".to_string(),
                last_name: "Garcia".to_string(),
                email: stored.email.clone(),
                ..NewClient::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(client.email, stored.email);
}

#[tokio::test]
async fn test_create_without_email_skips_uniqueness_check() {
    let agency_id = Uuid::new_v4();
    let mut stored = client_model(agency_id, "Li", "Chen");
    stored.email = None;
    let repo = repo(mock_db().append_query_results([vec![stored.clone()]]));

    let client = repo
        .create(
            agency_id,
            NewClient {
                first_name: "Li".to_string(),
                last_name: "Chen".to_string(),
                email: Some("   ".to_string()),
                ..NewClient::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(client.email, None);
}

#[tokio::test]
async fn test_update_missing_client() {
    let repo = repo(mock_db().append_query_results([Vec::<clients::Model>::new()]));
    let id = Uuid::new_v4();

    let result = repo.update(id, Uuid::new_v4(), ClientChanges::default()).await;
    assert!(matches!(result, Err(ClientError::NotFound(missing)) if missing == id));
}

#[tokio::test]
async fn test_update_rejects_email_of_other_client() {
    let agency_id = Uuid::new_v4();
    let existing = client_model(agency_id, "Maria", "Garcia");
    let repo = repo(
        mock_db()
            .append_query_results([vec![existing.clone()]])
            .append_query_results([vec![count_row(1)]]),
    );

    let result = repo
        .update(
            existing.id,
            agency_id,
            ClientChanges {
                email: Some(Some("james@example.com".to_string())),
                ..ClientChanges::default()
            },
        )
        .await;

    assert!(matches!(result, Err(ClientError::DuplicateEmail(_))));
}

#[tokio::test]
async fn test_delete_missing_client() {
    let repo = repo(mock_db().append_exec_results([exec_result(0)]));
    let id = Uuid::new_v4();

    let result = repo.delete(id, Uuid::new_v4()).await;
    assert!(matches!(result, Err(ClientError::NotFound(missing)) if missing == id));
}

#[tokio::test]
async fn test_delete_existing_client() {
    let repo = repo(mock_db().append_exec_results([exec_result(1)]));
    assert!(repo.delete(Uuid::new_v4(), Uuid::new_v4()).await.is_ok());
}
