//! Entity fixtures for repository unit tests.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};
use serde_json::json;
use uuid::Uuid;

use crate::entities::{
    activities, client_notes, clients, documents, policies,
    sea_orm_active_enums::{ActivityType, PolicyStatus, PolicyType},
};

pub fn mock_db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

pub fn empty_db() -> DatabaseConnection {
    mock_db().into_connection()
}

/// Row returned by `PaginatorTrait::count`.
pub fn count_row(n: i64) -> BTreeMap<String, Value> {
    BTreeMap::from([("num_items".to_string(), Value::BigInt(Some(n)))])
}

pub fn exec_result(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn client_model(agency_id: Uuid, first: &str, last: &str) -> clients::Model {
    let now = Utc::now().into();
    clients::Model {
        id: Uuid::new_v4(),
        agency_id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: Some(format!("{}@example.com", first.to_lowercase())),
        phone: Some("555-0100".to_string()),
        address: None,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn policy_model(agency_id: Uuid, client_id: Uuid, expiration: NaiveDate) -> policies::Model {
    let now = Utc::now().into();
    policies::Model {
        id: Uuid::new_v4(),
        agency_id,
        client_id,
        carrier: "Acme Mutual".to_string(),
        policy_number: "AUT-1001".to_string(),
        policy_type: PolicyType::Auto,
        effective_date: expiration - chrono::Duration::days(365),
        expiration_date: expiration,
        premium: dec!(1250.00),
        details: json!({"vehicles": 1}),
        status: PolicyStatus::Active,
        created_at: now,
        updated_at: now,
    }
}

pub fn activity_model(
    agency_id: Uuid,
    client_id: Option<Uuid>,
    policy_id: Option<Uuid>,
) -> activities::Model {
    let now = Utc::now().into();
    activities::Model {
        id: Uuid::new_v4(),
        agency_id,
        activity_type: ActivityType::Call,
        description: "Review coverage".to_string(),
        client_id,
        policy_id,
        due_date: Some(now),
        completed: false,
        completed_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn note_model(agency_id: Uuid, client_id: Uuid, content: &str) -> client_notes::Model {
    let now = Utc::now().into();
    client_notes::Model {
        id: Uuid::new_v4(),
        agency_id,
        client_id,
        content: content.to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub fn document_model(agency_id: Uuid, client_id: Option<Uuid>) -> documents::Model {
    documents::Model {
        id: Uuid::new_v4(),
        agency_id,
        client_id,
        policy_id: None,
        file_name: "id-card.pdf".to_string(),
        file_path: format!("{agency_id}/general/1760000000000-id-card.pdf"),
        file_size: Some(2048),
        mime_type: Some("application/pdf".to_string()),
        uploaded_at: Utc::now().into(),
    }
}
