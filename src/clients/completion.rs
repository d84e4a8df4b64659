use async_trait::async_trait;
use reqwest::{Client, Url};
use thiserror::Error;

use crate::clients::models::requests::ChatCompletionRequest;
use crate::clients::models::responses::ChatCompletionResponse;
use crate::config::AiConfig;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode completion response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Sends one chat-completion request. The program generator only talks to
/// the remote model through this trait, so tests can swap in a fake.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn complete(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, CompletionError>;
}

#[derive(Clone)]
pub struct CompletionClient {
    http: Client,
    endpoint: Url,
}

impl CompletionClient {
    pub fn new(config: &AiConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            endpoint: Url::parse(&config.api_url)?,
        })
    }
}

#[async_trait]
impl CompletionTransport for CompletionClient {
    async fn complete(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            model = %request.model,
            "ai.completion.request"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await?;
            return Err(CompletionError::Status { status, body });
        }

        let body = response.text().await?;
        let completion: ChatCompletionResponse = serde_json::from_str(&body)?;

        tracing::debug!(
            choice_count = completion.choices.len(),
            "ai.completion.response"
        );

        Ok(completion)
    }
}
