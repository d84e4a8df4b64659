use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::api::{
    ApiJson, ApiQuery, AppState, CLIENT_NOT_FOUND, client_ref, owned_client, owned_program,
    parse_date_bound, parse_id, program_ref,
};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::progress::{
    CreateProgressRequest, Progress, ProgressType, ProgressView, UpdateProgressRequest,
};
use crate::services::progress_stats;

const PROGRESS_NOT_FOUND: &str = "Progression non trouvée";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_progress).post(create_progress))
        .route("/client/{client_id}/stats", get(client_stats))
        .route(
            "/{id}",
            get(get_progress)
                .patch(update_progress)
                .delete(delete_progress),
        )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressFilter {
    client_id: Option<Uuid>,
    program_id: Option<Uuid>,
    #[serde(rename = "type")]
    progress_type: Option<ProgressType>,
    start_date: Option<String>,
    end_date: Option<String>,
}

async fn view(state: &AppState, progress: Progress) -> ProgressView {
    let client = client_ref(state, progress.client_id).await;
    let program = program_ref(state, progress.program_id).await;
    ProgressView {
        progress,
        client,
        program,
    }
}

async fn list_progress(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiQuery(filter): ApiQuery<ProgressFilter>,
) -> Result<Json<Value>, ApiError> {
    let from = parse_date_bound(filter.start_date.as_deref())?;
    let until = parse_date_bound(filter.end_date.as_deref())?;

    let mut records = state
        .store
        .progress
        .filter(|p| {
            p.created_by == user.id
                && filter.client_id.is_none_or(|id| p.client_id == id)
                && filter.program_id.is_none_or(|id| p.program_id == id)
                && filter.progress_type.is_none_or(|kind| p.progress_type == kind)
                && from.is_none_or(|from| p.date >= from)
                && until.is_none_or(|until| p.date <= until)
        })
        .await;
    records.sort_by(|a, b| b.date.cmp(&a.date));

    let mut views = Vec::with_capacity(records.len());
    for record in records {
        views.push(view(&state, record).await);
    }

    Ok(Json(json!({
        "success": true,
        "count": views.len(),
        "progress": views,
    })))
}

async fn get_progress(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, PROGRESS_NOT_FOUND)?;
    let progress = state
        .store
        .progress
        .find_owned(id, user.id)
        .await
        .ok_or_else(|| ApiError::not_found(PROGRESS_NOT_FOUND))?;

    Ok(Json(json!({
        "success": true,
        "progress": view(&state, progress).await,
    })))
}

async fn create_progress(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<CreateProgressRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let client = owned_client(&state, request.client_id, user.id).await?;
    let program = owned_program(&state, request.program_id, user.id).await?;

    let progress = request.into_progress(client.id, program.id, user.id)?;
    let progress = state.store.progress.insert(progress).await;

    tracing::info!(
        progress_id = %progress.id,
        client_id = %client.id,
        kind = ?progress.progress_type,
        "progress.recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Progression enregistrée avec succès",
            "progress": view(&state, progress).await,
        })),
    ))
}

async fn update_progress(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateProgressRequest>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, PROGRESS_NOT_FOUND)?;
    let progress = state
        .store
        .progress
        .update_owned(id, user.id, |progress| request.apply(progress))
        .await?
        .ok_or_else(|| ApiError::not_found(PROGRESS_NOT_FOUND))?;

    Ok(Json(json!({
        "success": true,
        "message": "Progression mise à jour avec succès",
        "progress": view(&state, progress).await,
    })))
}

async fn delete_progress(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, PROGRESS_NOT_FOUND)?;
    state
        .store
        .progress
        .delete_owned(id, user.id)
        .await
        .ok_or_else(|| ApiError::not_found(PROGRESS_NOT_FOUND))?;

    Ok(Json(json!({
        "success": true,
        "message": "Progression supprimée avec succès",
    })))
}

async fn client_stats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(client_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let client_id = parse_id(&client_id, CLIENT_NOT_FOUND)?;
    let client = owned_client(&state, Some(client_id), user.id).await?;

    let records = state
        .store
        .progress
        .filter(|p| p.client_id == client.id && p.created_by == user.id)
        .await;
    let report = progress_stats::client_progress_report(records);

    Ok(Json(json!({
        "success": true,
        "stats": report.stats,
        "measurements": report.measurements,
        "performances": report.performances,
    })))
}
