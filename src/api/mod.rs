use axum::{
    Json, Router,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::auth::{jwt::TokenIssuer, password::PasswordHasher};
use crate::error::ApiError;
use crate::models::{ClientRef, ProgramRef, client::Client, dates, program::Program};
use crate::services::program_generation::ProgramGenerator;
use crate::store::Store;

pub mod auth;
pub mod clients;
pub mod programs;
pub mod progress;
pub mod sessions;

pub const CLIENT_NOT_FOUND: &str = "Client non trouvé";
pub const PROGRAM_NOT_FOUND: &str = "Programme non trouvé";

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub tokens: TokenIssuer,
    pub passwords: PasswordHasher,
    pub generator: ProgramGenerator,
}

/// JSON body extractor whose rejections use the API error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Ids that do not parse cannot name a stored document.
pub fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::not_found(not_found))
}

pub fn parse_date_bound(raw: Option<&str>) -> Result<Option<chrono::DateTime<Utc>>, ApiError> {
    match raw {
        None => Ok(None),
        Some(text) => dates::parse_flexible(text)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(format!("Date invalide: {}", text))),
    }
}

/// Resolves a referenced client, which must exist and belong to `owner`.
pub async fn owned_client(
    state: &AppState,
    id: Option<Uuid>,
    owner: Uuid,
) -> Result<Client, ApiError> {
    match id {
        Some(id) => state.store.clients.find_owned(id, owner).await,
        None => None,
    }
    .ok_or_else(|| ApiError::not_found(CLIENT_NOT_FOUND))
}

pub async fn owned_program(
    state: &AppState,
    id: Option<Uuid>,
    owner: Uuid,
) -> Result<Program, ApiError> {
    match id {
        Some(id) => state.store.programs.find_owned(id, owner).await,
        None => None,
    }
    .ok_or_else(|| ApiError::not_found(PROGRAM_NOT_FOUND))
}

pub async fn client_ref(state: &AppState, id: Uuid) -> Option<ClientRef> {
    state.store.clients.get(id).await.map(|c| c.reference())
}

pub async fn program_ref(state: &AppState, id: Uuid) -> Option<ProgramRef> {
    state.store.programs.get(id).await.map(|p| p.reference())
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "API Coach Fit Squad Builder",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health",
            "auth": "/api/auth",
            "clients": "/api/clients",
            "programs": "/api/programs",
            "sessions": "/api/sessions",
            "progress": "/api/progress",
        }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "database": "Connected",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "Route non trouvée" })),
    )
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .nest("/api/auth", auth::routes())
        .nest("/api/clients", clients::routes())
        .nest("/api/programs", programs::routes())
        .nest("/api/sessions", sessions::routes())
        .nest("/api/progress", progress::routes())
        .fallback(not_found)
        .with_state(state)
}
