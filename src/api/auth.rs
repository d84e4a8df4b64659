use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::api::{ApiJson, AppState};
use crate::auth::{AuthError, AuthUser};
use crate::error::ApiError;
use crate::models::user::{LoginRequest, RegisterRequest, User, normalize_email};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_user = request.validate()?;
    let password_hash = state.passwords.hash(new_user.password).await?;
    let user = User::new(new_user.name, new_user.email, password_hash);

    let email = user.email.clone();
    let user = state
        .store
        .users
        .insert_unless(user, |existing| existing.email == email)
        .await
        .ok_or_else(|| {
            ApiError::BadRequest("Un utilisateur avec cet email existe déjà".to_string())
        })?;

    let token = state.tokens.issue(user.id)?;
    tracing::info!(user_id = %user.id, "auth.registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Utilisateur créé avec succès",
            "user": user.summary(),
            "token": token,
        })),
    ))
}

async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let (Some(email), Some(password)) = (
        request.email.filter(|e| !e.trim().is_empty()),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Email et mot de passe requis".to_string(),
        ));
    };

    let email = normalize_email(&email);
    let user = state
        .store
        .users
        .find_one(|u| u.email == email)
        .await
        .ok_or(AuthError::InvalidCredentials)?;

    if !state
        .passwords
        .verify(password, user.password_hash.clone())
        .await?
    {
        tracing::info!(user_id = %user.id, "auth.login_rejected");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.tokens.issue(user.id)?;
    tracing::info!(user_id = %user.id, "auth.logged_in");

    Ok(Json(json!({
        "success": true,
        "message": "Connexion réussie",
        "user": user.summary(),
        "token": token,
    })))
}

async fn me(AuthUser(user): AuthUser) -> Json<Value> {
    Json(json!({ "success": true, "user": user.summary() }))
}
