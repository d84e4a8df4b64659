use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};

use crate::api::{ApiJson, AppState, CLIENT_NOT_FOUND, parse_id};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::client::{CreateClientRequest, UpdateClientRequest};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route(
            "/{id}",
            get(get_client).put(update_client).delete(delete_client),
        )
}

async fn list_clients(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Json<Value> {
    let mut clients = state
        .store
        .clients
        .filter(|c| c.created_by == user.id)
        .await;
    clients.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Json(json!({
        "success": true,
        "count": clients.len(),
        "clients": clients,
    }))
}

async fn create_client(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<CreateClientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let client = request.into_client(user.id)?;
    let client = state.store.clients.insert(client).await;

    tracing::info!(client_id = %client.id, coach_id = %user.id, "client.created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Client créé avec succès",
            "client": client,
        })),
    ))
}

async fn get_client(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, CLIENT_NOT_FOUND)?;
    let client = state
        .store
        .clients
        .find_owned(id, user.id)
        .await
        .ok_or_else(|| ApiError::not_found(CLIENT_NOT_FOUND))?;

    Ok(Json(json!({ "success": true, "client": client })))
}

async fn update_client(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateClientRequest>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, CLIENT_NOT_FOUND)?;
    let client = state
        .store
        .clients
        .update_owned(id, user.id, |client| request.apply(client))
        .await?
        .ok_or_else(|| ApiError::not_found(CLIENT_NOT_FOUND))?;

    tracing::info!(client_id = %client.id, "client.updated");

    Ok(Json(json!({
        "success": true,
        "message": "Client mis à jour avec succès",
        "client": client,
    })))
}

async fn delete_client(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, CLIENT_NOT_FOUND)?;
    state
        .store
        .clients
        .delete_owned(id, user.id)
        .await
        .ok_or_else(|| ApiError::not_found(CLIENT_NOT_FOUND))?;

    tracing::info!(client_id = %id, "client.deleted");

    Ok(Json(json!({
        "success": true,
        "message": "Client supprimé avec succès",
    })))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::api::router;
    use crate::api::test_support::*;

    #[tokio::test]
    async fn test_client_crud() {
        let app = router(test_state());
        let token = register(&app, "coach@example.com").await;

        let client = create_client(&app, &token, alex()).await;
        let id = client["id"].as_str().unwrap().to_string();
        assert_eq!(client["preferredTime"], "morning");
        assert_eq!(client["isActive"], true);

        let (status, body) = send(&app, Method::GET, "/api/clients", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/clients/{}", id),
            Some(&token),
            Some(json!({"weight": 72.5, "goals": ["strength"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["client"]["weight"], 72.5);
        assert_eq!(body["client"]["goals"], json!(["strength"]));
        assert_eq!(body["client"]["name"], "Alex");

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/api/clients/{}", id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/clients/{}", id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Client non trouvé");
    }

    #[tokio::test]
    async fn test_clients_are_scoped_to_their_coach() {
        let app = router(test_state());
        let owner = register(&app, "owner@example.com").await;
        let other = register(&app, "other@example.com").await;

        let client = create_client(&app, &owner, alex()).await;
        let uri = format!("/api/clients/{}", client["id"].as_str().unwrap());

        let (status, _) = send(&app, Method::GET, &uri, Some(&other), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&other), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&app, Method::GET, "/api/clients", Some(&other), None).await;
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_invalid_client_payloads() {
        let app = router(test_state());
        let token = register(&app, "coach@example.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/clients",
            Some(&token),
            Some(json!({"name": "Alex", "email": "a@example.com", "age": 30})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/clients",
            Some(&token),
            Some(json!({"name": "Alex", "email": "a@example.com", "age": 30, "fitnessLevel": "elite"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::GET,
            "/api/clients/not-a-uuid",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
