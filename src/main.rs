use std::sync::Arc;

use axum::http::{HeaderValue, Method, header};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::api::AppState;
use crate::auth::{jwt::TokenIssuer, password::PasswordHasher};
use crate::clients::completion::CompletionClient;
use crate::config::Config;
use crate::services::program_generation::ProgramGenerator;
use crate::store::Store;

mod api;
mod auth;
mod clients;
mod config;
mod error;
mod models;
mod services;
mod store;

const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origins = config
        .cors_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let completion_client = Arc::new(CompletionClient::new(&config.ai)?);
    let generator = ProgramGenerator::new(config.ai.clone(), completion_client);
    if config.ai.api_key.is_some() {
        tracing::info!(model = %generator.model(), "ai.configured");
    } else {
        tracing::warn!("ai.not_configured.local_generator_only");
    }

    let state = AppState {
        store: Store::new(),
        tokens: TokenIssuer::new(&config.auth),
        passwords: PasswordHasher::new(config.auth.bcrypt_cost),
        generator,
    };

    let app = api::router(state)
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(cors_layer(&config)?)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = %config.port, "server.listening");
    axum::serve(listener, app).await?;
    Ok(())
}
