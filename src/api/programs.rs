use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::api::{
    ApiJson, ApiQuery, AppState, PROGRAM_NOT_FOUND, client_ref, owned_client, parse_id,
};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::program::{
    CreateProgramRequest, GenerateProgramRequest, Program, ProgramStatus, ProgramView,
    ProgressEntryRequest, UpdateProgramRequest,
};
use crate::services::program_adapter;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_programs).post(create_program))
        .route("/generate", post(generate_program))
        .route(
            "/{id}",
            get(get_program).put(update_program).delete(delete_program),
        )
        .route("/{id}/progress", post(add_progress))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgramFilter {
    client_id: Option<Uuid>,
    status: Option<ProgramStatus>,
}

async fn view(state: &AppState, program: Program) -> ProgramView {
    let client = client_ref(state, program.client_id).await;
    ProgramView { program, client }
}

async fn generate_program(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<GenerateProgramRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let client = owned_client(&state, request.client_id, user.id).await?;

    tracing::info!(
        client_id = %client.id,
        fitness_level = client.fitness_level.as_str(),
        days = client.available_days.len(),
        "program.generation_started"
    );

    let generated = state.generator.generate_program(&client.profile()).await;
    let program = program_adapter::into_program(generated, &client, user.id);
    let program = state.store.programs.insert(program).await;

    tracing::info!(
        program_id = %program.id,
        generated_by_ai = program.generated_by_ai,
        workouts = program.workouts.len(),
        "program.generated"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Programme généré avec succès",
            "program": view(&state, program).await,
        })),
    ))
}

async fn list_programs(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiQuery(filter): ApiQuery<ProgramFilter>,
) -> Json<Value> {
    let mut programs = state
        .store
        .programs
        .filter(|p| {
            p.created_by == user.id
                && filter.client_id.is_none_or(|id| p.client_id == id)
                && filter.status.is_none_or(|status| p.status == status)
        })
        .await;
    programs.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut views = Vec::with_capacity(programs.len());
    for program in programs {
        views.push(view(&state, program).await);
    }

    Json(json!({
        "success": true,
        "count": views.len(),
        "programs": views,
    }))
}

async fn create_program(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<CreateProgramRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let client = owned_client(&state, request.client_id, user.id).await?;
    let program = request.into_program(client.id, user.id)?;
    let program = state.store.programs.insert(program).await;

    tracing::info!(program_id = %program.id, client_id = %client.id, "program.created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Programme créé avec succès",
            "program": view(&state, program).await,
        })),
    ))
}

async fn get_program(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, PROGRAM_NOT_FOUND)?;
    let program = state
        .store
        .programs
        .find_owned(id, user.id)
        .await
        .ok_or_else(|| ApiError::not_found(PROGRAM_NOT_FOUND))?;

    Ok(Json(json!({
        "success": true,
        "program": view(&state, program).await,
    })))
}

async fn update_program(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateProgramRequest>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, PROGRAM_NOT_FOUND)?;
    let program = state
        .store
        .programs
        .update_owned(id, user.id, |program| request.apply(program))
        .await?
        .ok_or_else(|| ApiError::not_found(PROGRAM_NOT_FOUND))?;

    tracing::info!(program_id = %program.id, "program.updated");

    Ok(Json(json!({
        "success": true,
        "message": "Programme mis à jour avec succès",
        "program": view(&state, program).await,
    })))
}

async fn delete_program(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, PROGRAM_NOT_FOUND)?;
    state
        .store
        .programs
        .delete_owned(id, user.id)
        .await
        .ok_or_else(|| ApiError::not_found(PROGRAM_NOT_FOUND))?;

    tracing::info!(program_id = %id, "program.deleted");

    Ok(Json(json!({
        "success": true,
        "message": "Programme supprimé avec succès",
    })))
}

async fn add_progress(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<ProgressEntryRequest>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, PROGRAM_NOT_FOUND)?;
    let entry = request.into_entry();
    let program = state
        .store
        .programs
        .update_owned(id, user.id, |program| {
            program.progress.push(entry);
            Ok::<(), ApiError>(())
        })
        .await?
        .ok_or_else(|| ApiError::not_found(PROGRAM_NOT_FOUND))?;

    Ok(Json(json!({
        "success": true,
        "message": "Progression ajoutée avec succès",
        "program": view(&state, program).await,
    })))
}
