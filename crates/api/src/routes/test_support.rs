//! Router test harness backed by SeaORM's mock database.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, header},
    response::Response,
};
use brokerdesk_core::renewal::{TimezoneCache, parse_timezone};
use brokerdesk_core::storage::StorageService;
use brokerdesk_shared::JwtService;
use brokerdesk_shared::config::ServerConfig;
use brokerdesk_shared::jwt::JwtConfig;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use brokerdesk_db::entities::sea_orm_active_enums::{ActivityType, PolicyStatus, PolicyType};
use brokerdesk_db::entities::{activities, client_notes, clients, documents, policies};

use crate::{AppState, create_router};

pub fn mock_db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

/// A router wired to a mock database and a token for one agency.
pub struct TestApp {
    router: Router,
    token: String,
    pub agency_id: Uuid,
}

impl TestApp {
    pub fn new(db: MockDatabase) -> Self {
        Self::with_storage(db, None)
    }

    pub fn with_storage(db: MockDatabase, storage: Option<Arc<StorageService>>) -> Self {
        let jwt_service = JwtService::new(JwtConfig::default());
        let agency_id = Uuid::new_v4();
        let token = jwt_service
            .issue_token(Uuid::new_v4(), agency_id, "agent")
            .expect("should issue token");

        // Pre-seed the zone so handlers don't query the agency row.
        let timezones = TimezoneCache::new();
        timezones.insert(agency_id, parse_timezone("UTC"));

        let state = AppState {
            db: Arc::new(db.into_connection()),
            jwt_service: Arc::new(jwt_service),
            storage,
            timezones,
        };

        Self {
            router: create_router(state, &ServerConfig::default()),
            token,
            agency_id,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).expect("valid request"))
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Response {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> Response {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        self.request(Method::DELETE, uri, None).await
    }

    pub async fn get_anonymous(&self, uri: &str) -> Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("valid request"),
            )
            .await
            .expect("router is infallible")
    }

    pub async fn get_with_header(&self, uri: &str, authorization: &str) -> Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header(header::AUTHORIZATION, authorization)
                    .body(Body::empty())
                    .expect("valid request"),
            )
            .await
            .expect("router is infallible")
    }
}

pub async fn json_body(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

pub fn exec_result(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

pub fn count_row(n: i64) -> std::collections::BTreeMap<String, sea_orm::Value> {
    std::collections::BTreeMap::from([("num_items".to_string(), sea_orm::Value::BigInt(Some(n)))])
}

fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 9, 30, 0).single().expect("valid time")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn client_model(agency_id: Uuid, first: &str, last: &str) -> clients::Model {
    clients::Model {
        id: Uuid::new_v4(),
        agency_id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: Some(format!("{}@example.com", first.to_lowercase())),
        phone: Some("555-0100".to_string()),
        address: None,
        notes: None,
        created_at: timestamp().into(),
        updated_at: timestamp().into(),
    }
}

pub fn policy_model(agency_id: Uuid, client_id: Uuid, expiration: NaiveDate) -> policies::Model {
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
        details: serde_json::json!({"vehicles": 2}),
        status: PolicyStatus::Active,
        created_at: timestamp().into(),
        updated_at: timestamp().into(),
    }
}

pub fn activity_model(
    agency_id: Uuid,
    client_id: Option<Uuid>,
    policy_id: Option<Uuid>,
) -> activities::Model {
    activities::Model {
        id: Uuid::new_v4(),
        agency_id,
        activity_type: ActivityType::Call,
        description: "Review coverage".to_string(),
        client_id,
        policy_id,
        due_date: Some(timestamp().into()),
        completed: false,
        completed_at: None,
        created_at: timestamp().into(),
        updated_at: timestamp().into(),
    }
}

pub fn note_model(agency_id: Uuid, client_id: Uuid, content: &str) -> client_notes::Model {
    client_notes::Model {
        id: Uuid::new_v4(),
        agency_id,
        client_id,
        content: content.to_string(),
        created_at: timestamp().into(),
        updated_at: timestamp().into(),
    }
}

pub fn document_model(agency_id: Uuid, client_id: Option<Uuid>) -> documents::Model {
    let id = Uuid::new_v4();
    documents::Model {
        id,
        agency_id,
        client_id,
        policy_id: None,
        file_name: "id-card.pdf".to_string(),
        file_path: format!("{agency_id}/general/1760000000000-{id}-id-card.pdf"),
        file_size: Some(48_213),
        mime_type: Some("application/pdf".to_string()),
        uploaded_at: timestamp().into(),
    }
}
