mod dto;
mod error;
mod handlers;
mod models;
mod repository;
mod service;

use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, post, put},
};

use std::{env, sync::Arc};

use handlers::rest;
use repository::Repository;

use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use service::NoteService;

const DEFAULT_DB_PATH: &str = "data/notes.db";
const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:3000";

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt::init();

    // Fetch env variables
    let db_path = env::var("NOTES_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    let frontend_origin =
        env::var("FRONTEND_ORIGIN").unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGIN.to_string());

    // Repository creation and schema bootstrap
    let repo = Arc::new(Repository::new(&db_path));
    repo.bootstrap().unwrap_or_else(|e| {
        tracing::error!("Failed to bootstrap database at {db_path}: {e}");
        panic!("failed to bootstrap database: {e}");
    });
    tracing::info!("Using notes database at {}", repo.path().display());

    // Service creation
    let service = Arc::new(NoteService::new(repo));

    // The browser client sends credentialed requests, so the origin must be
    // exact and methods/headers are mirrored rather than wildcarded.
    let origin = frontend_origin.parse::<HeaderValue>().unwrap_or_else(|e| {
        tracing::error!("Invalid FRONTEND_ORIGIN '{frontend_origin}': {e}");
        panic!("invalid FRONTEND_ORIGIN: {e}");
    });
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    // Router config
    let router = api_router(service)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", rest::ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();

    // Starting router
    tracing::info!("Started listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, router)
        .await
        .expect("failed to start server");
}

fn api_router(service: Arc<NoteService>) -> Router {
    Router::new()
        .route("/health", get(rest::health_check))
        .route("/docs/help", get(rest::docs_help))
        .route("/notes", post(rest::create_note))
        .route("/notes/{id}", put(rest::update_note))
        .route("/notes/{id}", delete(rest::delete_note))
        .route("/notes/{id}", get(rest::get_one_note))
        .route("/notes", get(rest::get_all_notes))
        .with_state(service)
}
