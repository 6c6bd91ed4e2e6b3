use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    dto::{
        CreateNoteRequest, DeleteNoteResponse, HealthResponse, HelpEndpoints, HelpResponse,
        NoteResponse, UpdateNoteRequest,
    },
    error::ServiceError,
    service::NoteService,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        docs_help,
        create_note,
        update_note,
        delete_note,
        get_one_note,
        get_all_notes
    ),
    components(schemas(
        NoteResponse,
        CreateNoteRequest,
        UpdateNoteRequest,
        DeleteNoteResponse,
        HealthResponse,
        HelpResponse,
        HelpEndpoints
    )),
    tags(
        (name = "health", description = "Service liveness"),
        (name = "docs", description = "API usage help"),
        (name = "notes", description = "Notes management API")
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    ),
    tag = "health"
)]
#[debug_handler]
pub async fn health_check() -> Response {
    let health = HealthResponse {
        message: "Healthy".to_string(),
    };
    (StatusCode::OK, Json(health)).into_response()
}

#[utoipa::path(
    get,
    path = "/docs/help",
    responses(
        (status = 200, description = "Listing of the notes endpoints", body = HelpResponse)
    ),
    tag = "docs"
)]
#[debug_handler]
pub async fn docs_help() -> Response {
    let help = HelpResponse {
        endpoints: HelpEndpoints {
            list_notes: "GET /notes".to_string(),
            create_note: "POST /notes".to_string(),
            get_note: "GET /notes/{id}".to_string(),
            update_note: "PUT /notes/{id}".to_string(),
            delete_note: "DELETE /notes/{id}".to_string(),
        },
    };
    (StatusCode::OK, Json(help)).into_response()
}

#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = NoteResponse),
        (status = 400, description = "Invalid title"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    Json(payload): Json<CreateNoteRequest>,
) -> Response {
    match service.create_note(payload).await {
        Ok(note) => (StatusCode::CREATED, Json(note)).into_response(),
        Err(ServiceError::InvalidInput(msg)) => (StatusCode::BAD_REQUEST, msg).into_response(),
        Err(e) => {
            tracing::error!("failed to create note entry: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create note").into_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = NoteResponse),
        (status = 400, description = "Invalid title"),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateNoteRequest>,
) -> Response {
    match service.update_note(id, payload).await {
        Ok(note) => (StatusCode::OK, Json(note)).into_response(),
        Err(ServiceError::NotFound(_)) => (StatusCode::NOT_FOUND, "Note not found").into_response(),
        Err(ServiceError::InvalidInput(msg)) => (StatusCode::BAD_REQUEST, msg).into_response(),
        Err(e) => {
            tracing::error!("failed to update note entry: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to update note").into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted successfully", body = DeleteNoteResponse),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(State(service): State<Arc<NoteService>>, Path(id): Path<i64>) -> Response {
    match service.delete_note(id).await {
        Ok(()) => {
            let confirmation = DeleteNoteResponse {
                status: "deleted".to_string(),
                id,
            };
            (StatusCode::OK, Json(confirmation)).into_response()
        }
        Err(ServiceError::NotFound(_)) => (StatusCode::NOT_FOUND, "Note not found").into_response(),
        Err(e) => {
            tracing::error!("failed to delete note entry: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete note").into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_one_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<i64>,
) -> Response {
    match service.get_one_note(id).await {
        Ok(note) => (StatusCode::OK, Json(note)).into_response(),
        Err(ServiceError::NotFound(_)) => (StatusCode::NOT_FOUND, "Note not found").into_response(),
        Err(e) => {
            tracing::error!("failed to get note entry: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to get note").into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/notes",
    responses(
        (status = 200, description = "All notes, most recently updated first", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(State(service): State<Arc<NoteService>>) -> Response {
    match service.get_all_notes().await {
        Ok(notes) => (StatusCode::OK, Json(notes)).into_response(),
        Err(e) => {
            tracing::error!("failed to get note entries: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to get all notes").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tempfile::{TempDir, tempdir};
    use tower::ServiceExt;

    use crate::{repository::Repository, service::NoteService};

    fn test_app() -> (TempDir, Router) {
        let dir = tempdir().unwrap();
        let repo = Arc::new(Repository::new(dir.path().join("notes.db")));
        repo.bootstrap().unwrap();
        let service = Arc::new(NoteService::new(repo));
        (dir, crate::api_router(service))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let request = match body {
            Some(json) => Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    fn as_json(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn health_returns_healthy_message() {
        let (_dir, app) = test_app();

        let (status, body) = send(&app, Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(as_json(&body), json!({"message": "Healthy"}));
    }

    #[tokio::test]
    async fn docs_help_lists_all_five_endpoints() {
        let (_dir, app) = test_app();

        let (status, body) = send(&app, Method::GET, "/docs/help", None).await;

        assert_eq!(status, StatusCode::OK);
        let endpoints = &as_json(&body)["endpoints"];
        assert_eq!(endpoints["list_notes"], "GET /notes");
        assert_eq!(endpoints["create_note"], "POST /notes");
        assert_eq!(endpoints["get_note"], "GET /notes/{id}");
        assert_eq!(endpoints["update_note"], "PUT /notes/{id}");
        assert_eq!(endpoints["delete_note"], "DELETE /notes/{id}");
    }

    #[tokio::test]
    async fn full_crud_scenario() {
        let (_dir, app) = test_app();

        // Create
        let (status, body) = send(
            &app,
            Method::POST,
            "/notes",
            Some(json!({"title": "A", "content": "B"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created = as_json(&body);
        assert_eq!(created["id"], 1);
        assert_eq!(created["title"], "A");
        assert_eq!(created["content"], "B");
        assert_eq!(created["created_at"], created["updated_at"]);

        // Read back
        let (status, body) = send(&app, Method::GET, "/notes/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(as_json(&body), created);

        // Update
        std::thread::sleep(std::time::Duration::from_millis(5));
        let (status, body) = send(
            &app,
            Method::PUT,
            "/notes/1",
            Some(json!({"title": "A2", "content": "B2"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let updated = as_json(&body);
        assert_eq!(updated["title"], "A2");
        assert_eq!(updated["content"], "B2");
        assert_eq!(updated["created_at"], created["created_at"]);
        assert!(
            updated["updated_at"].as_str().unwrap() > created["updated_at"].as_str().unwrap(),
            "updated_at must move forward on update"
        );

        // Delete
        let (status, body) = send(&app, Method::DELETE, "/notes/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(as_json(&body), json!({"status": "deleted", "id": 1}));

        // Gone
        let (status, _) = send(&app, Method::GET, "/notes/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_trims_title_in_round_trip() {
        let (_dir, app) = test_app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/notes",
            Some(json!({"title": "  Groceries  ", "content": "milk, eggs"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        let note = as_json(&body);
        assert_eq!(note["title"], "Groceries");
        assert_eq!(note["content"], "milk, eggs");
    }

    #[tokio::test]
    async fn empty_title_is_rejected_without_writing_a_row() {
        let (_dir, app) = test_app();

        let (status, _) = send(
            &app,
            Method::POST,
            "/notes",
            Some(json!({"title": "   ", "content": "b"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, Method::GET, "/notes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(as_json(&body), json!([]));
    }

    #[tokio::test]
    async fn missing_required_field_is_a_client_error() {
        let (_dir, app) = test_app();

        let (status, _) = send(&app, Method::POST, "/notes", Some(json!({"title": "A"}))).await;

        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn list_puts_most_recently_updated_first() {
        let (_dir, app) = test_app();

        for title in ["first", "second", "third"] {
            let (status, _) = send(
                &app,
                Method::POST,
                "/notes",
                Some(json!({"title": title, "content": ""})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        // Touching the oldest note moves it to the front.
        std::thread::sleep(std::time::Duration::from_millis(5));
        let (status, _) = send(
            &app,
            Method::PUT,
            "/notes/1",
            Some(json!({"title": "first touched", "content": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::GET, "/notes", None).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<i64> = as_json(&body)
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[tokio::test]
    async fn update_and_delete_missing_note_return_not_found() {
        let (_dir, app) = test_app();

        let (status, _) = send(
            &app,
            Method::PUT,
            "/notes/99",
            Some(json!({"title": "t", "content": "c"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, "/notes/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
