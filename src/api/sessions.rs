use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::api::{
    ApiJson, ApiQuery, AppState, client_ref, owned_client, owned_program, parse_date_bound,
    parse_id, program_ref,
};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::session::{
    CreateSessionRequest, Session, SessionStatus, SessionView, UpdateSessionRequest,
};

const SESSION_NOT_FOUND: &str = "Séance non trouvée";
const UPCOMING_LIMIT: usize = 10;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route("/filter/upcoming", get(upcoming_sessions))
        .route(
            "/{id}",
            get(get_session).patch(update_session).delete(delete_session),
        )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFilter {
    client_id: Option<Uuid>,
    program_id: Option<Uuid>,
    status: Option<SessionStatus>,
    start_date: Option<String>,
    end_date: Option<String>,
}

async fn view(state: &AppState, session: Session) -> SessionView {
    let client = client_ref(state, session.client_id).await;
    let program = program_ref(state, session.program_id).await;
    SessionView {
        session,
        client,
        program,
    }
}

async fn views(state: &AppState, sessions: Vec<Session>) -> Vec<SessionView> {
    let mut views = Vec::with_capacity(sessions.len());
    for session in sessions {
        views.push(view(state, session).await);
    }
    views
}

async fn list_sessions(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiQuery(filter): ApiQuery<SessionFilter>,
) -> Result<Json<Value>, ApiError> {
    let from = parse_date_bound(filter.start_date.as_deref())?;
    let until = parse_date_bound(filter.end_date.as_deref())?;

    let mut sessions = state
        .store
        .sessions
        .filter(|s| {
            s.created_by == user.id
                && filter.client_id.is_none_or(|id| s.client_id == id)
                && filter.program_id.is_none_or(|id| s.program_id == id)
                && filter.status.is_none_or(|status| s.status == status)
                && from.is_none_or(|from| s.scheduled_date >= from)
                && until.is_none_or(|until| s.scheduled_date <= until)
        })
        .await;
    sessions.sort_by(|a, b| b.scheduled_date.cmp(&a.scheduled_date));

    let sessions = views(&state, sessions).await;
    Ok(Json(json!({
        "success": true,
        "count": sessions.len(),
        "sessions": sessions,
    })))
}

async fn upcoming_sessions(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Json<Value> {
    let now = Utc::now();
    let mut sessions = state
        .store
        .sessions
        .filter(|s| {
            s.created_by == user.id
                && s.status == SessionStatus::Scheduled
                && s.scheduled_date >= now
        })
        .await;
    sessions.sort_by_key(|s| s.scheduled_date);
    sessions.truncate(UPCOMING_LIMIT);

    let sessions = views(&state, sessions).await;
    Json(json!({
        "success": true,
        "count": sessions.len(),
        "sessions": sessions,
    }))
}

async fn get_session(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, SESSION_NOT_FOUND)?;
    let session = state
        .store
        .sessions
        .find_owned(id, user.id)
        .await
        .ok_or_else(|| ApiError::not_found(SESSION_NOT_FOUND))?;

    Ok(Json(json!({
        "success": true,
        "session": view(&state, session).await,
    })))
}

async fn create_session(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<CreateSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let client = owned_client(&state, request.client_id, user.id).await?;
    let program = owned_program(&state, request.program_id, user.id).await?;

    let session =
        request.into_session(client.id, program.id, client.session_duration, user.id)?;
    let session = state.store.sessions.insert(session).await;

    tracing::info!(
        session_id = %session.id,
        client_id = %client.id,
        scheduled = %session.scheduled_date,
        "session.scheduled"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Séance planifiée avec succès",
            "session": view(&state, session).await,
        })),
    ))
}

async fn update_session(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateSessionRequest>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, SESSION_NOT_FOUND)?;
    let session = state
        .store
        .sessions
        .update_owned(id, user.id, |session| request.apply(session))
        .await?
        .ok_or_else(|| ApiError::not_found(SESSION_NOT_FOUND))?;

    tracing::info!(session_id = %session.id, status = ?session.status, "session.updated");

    Ok(Json(json!({
        "success": true,
        "message": "Séance mise à jour avec succès",
        "session": view(&state, session).await,
    })))
}

async fn delete_session(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, SESSION_NOT_FOUND)?;
    state
        .store
        .sessions
        .delete_owned(id, user.id)
        .await
        .ok_or_else(|| ApiError::not_found(SESSION_NOT_FOUND))?;

    Ok(Json(json!({
        "success": true,
        "message": "Séance supprimée avec succès",
    })))
}
