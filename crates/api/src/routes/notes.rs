//! Client note routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use brokerdesk_core::note::normalize_content;
use brokerdesk_db::NoteRepository;
use brokerdesk_shared::types::ApiResponse;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::extractors::{QueryParams, ValidatedJson, parse_id};
use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the note routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/{id}", put(update_note).delete(delete_note))
}

/// Query parameters for listing notes.
#[derive(Debug, Default, Deserialize)]
pub struct ListNotesQuery {
    /// Client whose notes to list. Required.
    pub client_id: Option<String>,
}

/// Request body for creating a note.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNoteRequest {
    /// Client the note is about.
    pub client_id: Uuid,
    /// Note body.
    pub content: String,
}

/// Request body for editing a note.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateNoteRequest {
    /// New note body.
    pub content: String,
}

fn note_content(raw: &str) -> Result<String, ApiError> {
    normalize_content(raw).ok_or_else(|| ApiError::validation("Note content is required"))
}

/// GET `/notes?client_id=`
async fn list_notes(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<ListNotesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let client_id = match query.client_id.as_deref().map(str::trim) {
        None | Some("") => return Err(ApiError::validation("client_id is required")),
        Some(raw) => parse_id(raw, "client")?,
    };

    let notes = NoteRepository::new((*state.db).clone())
        .list_for_client(client_id, auth.agency_id())
        .await?;

    Ok(Json(ApiResponse::ok(notes)))
}

/// POST `/notes`
async fn create_note(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = note_content(&payload.content)?;

    let note = NoteRepository::new((*state.db).clone())
        .create(auth.agency_id(), payload.client_id, content)
        .await?;

    info!(
        agency_id = %auth.agency_id(),
        client_id = %note.client_id,
        note_id = %note.id,
        "Note added"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(note, "Note created successfully")),
    ))
}

/// PUT `/notes/{id}`
async fn update_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "note")?;
    let content = note_content(&payload.content)?;

    let note = NoteRepository::new((*state.db).clone())
        .update(id, auth.agency_id(), content)
        .await?;

    Ok(Json(ApiResponse::with_message(
        note,
        "Note updated successfully",
    )))
}

/// DELETE `/notes/{id}`
async fn delete_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "note")?;

    NoteRepository::new((*state.db).clone())
        .delete(id, auth.agency_id())
        .await?;

    info!(agency_id = %auth.agency_id(), note_id = %id, "Note deleted");

    Ok(Json(ApiResponse::with_message((), "Note deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{
        TestApp, count_row, exec_result, json_body, mock_db, note_model,
    };
    use brokerdesk_db::entities::client_notes;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_requires_client_id() {
        let app = TestApp::new(mock_db());

        let response = app.get("/api/v1/notes").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], "client_id is required");

        let response = app.get("/api/v1/notes?client_id=42").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["message"],
            "Invalid client ID format"
        );
    }

    #[tokio::test]
    async fn test_list_notes() {
        let agency_id = Uuid::new_v4();
        let client_id = Uuid::new_v4();
        let newer = note_model(agency_id, client_id, "Wants a bundle quote");
        let older = note_model(agency_id, client_id, "Prefers email");
        let app = TestApp::new(mock_db().append_query_results([vec![newer, older]]));

        let response = app
            .get(&format!("/api/v1/notes?client_id={client_id}"))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["data"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["data"][0]["content"], "Wants a bundle quote");
    }

    #[tokio::test]
    async fn test_create_note_trims_content() {
        let agency_id = Uuid::new_v4();
        let client_id = Uuid::new_v4();
        let created = note_model(agency_id, client_id, "Called about renewal.");
        let app = TestApp::new(
            mock_db()
                .append_query_results([vec![count_row(1)]])
                .append_query_results([vec![created]]),
        );

        let response = app
            .post(
                "/api/v1/notes",
                json!({"client_id": client_id, "content": "  Called about renewal. \n"}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            json_body(response).await["message"],
            "Note created successfully"
        );
    }

    #[tokio::test]
    async fn test_create_blank_note() {
        let app = TestApp::new(mock_db());

        let response = app
            .post(
                "/api/v1/notes",
                json!({"client_id": Uuid::new_v4(), "content": "   "}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_note_for_unknown_client() {
        let app = TestApp::new(mock_db().append_query_results([vec![count_row(0)]]));

        let response = app
            .post(
                "/api/v1/notes",
                json!({"client_id": Uuid::new_v4(), "content": "Hello"}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["message"], "Client not found");
    }

    #[tokio::test]
    async fn test_update_missing_note() {
        let app =
            TestApp::new(mock_db().append_query_results([Vec::<client_notes::Model>::new()]));

        let response = app
            .put(
                &format!("/api/v1/notes/{}", Uuid::new_v4()),
                json!({"content": "Updated"}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["message"], "Note not found");
    }

    #[tokio::test]
    async fn test_delete_note() {
        let app = TestApp::new(mock_db().append_exec_results([exec_result(1)]));

        let response = app
            .delete(&format!("/api/v1/notes/{}", Uuid::new_v4()))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
