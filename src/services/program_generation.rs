use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::clients::completion::CompletionTransport;
use crate::clients::models::requests::{ChatCompletionRequest, ChatMessage};
use crate::config::AiConfig;
use crate::models::generation::{ClientProfile, GeneratedProgram};
use crate::services::{ai_parser, ai_prompt, fallback};

pub const TEMPERATURE: f64 = 0.7;
pub const MAX_TOKENS: u32 = 2000;

/// How a single generation call is served, decided from configuration.
#[derive(Debug, PartialEq, Eq)]
enum GenerationStrategy<'a> {
    Remote { api_key: &'a str },
    Local,
}

/// Builds training programs for clients. Always returns a usable program:
/// any failure on the remote path falls back to the local templates.
#[derive(Clone)]
pub struct ProgramGenerator {
    config: AiConfig,
    transport: Arc<dyn CompletionTransport>,
}

impl ProgramGenerator {
    pub fn new(config: AiConfig, transport: Arc<dyn CompletionTransport>) -> Self {
        Self { config, transport }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn strategy(&self) -> GenerationStrategy<'_> {
        match self.config.api_key.as_deref() {
            Some(api_key) if !api_key.trim().is_empty() => GenerationStrategy::Remote { api_key },
            _ => GenerationStrategy::Local,
        }
    }

    pub async fn generate_program(&self, profile: &ClientProfile) -> GeneratedProgram {
        match self.strategy() {
            GenerationStrategy::Local => {
                info!(client = %profile.name, "ai.not_configured.using_fallback");
                fallback::generate_fallback_program(profile)
            }
            GenerationStrategy::Remote { api_key } => {
                match self.generate_remote(api_key, profile).await {
                    Ok(program) => {
                        info!(
                            client = %profile.name,
                            program = %program.name,
                            model = %self.config.model,
                            "ai.program_generated"
                        );
                        program
                    }
                    Err(e) => {
                        warn!(error = %e, client = %profile.name, "ai.generation_failed.using_fallback");
                        fallback::generate_fallback_program(profile)
                    }
                }
            }
        }
    }

    fn build_request(&self, profile: &ClientProfile) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(ai_prompt::SYSTEM_INSTRUCTION),
                ChatMessage::user(ai_prompt::build_program_prompt(profile)),
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    async fn generate_remote(
        &self,
        api_key: &str,
        profile: &ClientProfile,
    ) -> Result<GeneratedProgram> {
        let request = self.build_request(profile);

        debug!(prompt = %request.messages[1].content, "ai.prompt");

        let response = self.transport.complete(api_key, &request).await?;
        let content = response
            .first_content()
            .ok_or_else(|| anyhow::anyhow!("Completion response contains no choice"))?;

        debug!(response = %content, "ai.response");

        let mut program = ai_parser::parse_program_response(content)?;
        program.generated_by_ai = true;
        program.ai_model = Some(self.config.model.clone());
        Ok(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::clients::completion::CompletionError;
    use crate::clients::models::responses::ChatCompletionResponse;
    use crate::models::common::{FitnessLevel, Goal, Weekday};
    use crate::models::generation::GeneratedWorkout;

    const AI_PROGRAM: &str = r#"{
        "name": "Objectif Sèche",
        "description": "Programme cardio et renforcement",
        "duration": 12,
        "frequency": 3,
        "workouts": [
            {"day": 1, "name": "Cardio HIIT", "focus": "Cardio",
             "exercises": [{"name": "Jumping jacks", "sets": 3, "reps": "45 secondes", "rest": 30, "notes": "Rythme soutenu"}]},
            {"day": 2, "name": "Renforcement", "focus": "Jambes",
             "exercises": [{"name": "Squats", "sets": 4, "reps": 12, "rest": 60}]}
        ]
    }"#;

    enum Reply {
        Content(String),
        NoChoices,
        Failure,
    }

    struct FakeTransport {
        reply: Reply,
        requests: Mutex<Vec<(String, ChatCompletionRequest)>>,
    }

    impl FakeTransport {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionTransport for FakeTransport {
        async fn complete(
            &self,
            api_key: &str,
            request: &ChatCompletionRequest,
        ) -> Result<ChatCompletionResponse, CompletionError> {
            self.requests
                .lock()
                .unwrap()
                .push((api_key.to_string(), request.clone()));

            match &self.reply {
                Reply::Content(content) => Ok(ChatCompletionResponse::with_content(content)),
                Reply::NoChoices => Ok(ChatCompletionResponse::default()),
                Reply::Failure => Err(CompletionError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                }),
            }
        }
    }

    fn config(api_key: Option<&str>) -> AiConfig {
        AiConfig {
            api_key: api_key.map(str::to_string),
            model: "llama-3.3-70b-versatile".to_string(),
            ..AiConfig::default()
        }
    }

    fn alex() -> ClientProfile {
        ClientProfile {
            name: "Alex".to_string(),
            fitness_level: Some(FitnessLevel::Beginner),
            available_days: vec![Weekday::Monday, Weekday::Wednesday, Weekday::Friday],
            goals: vec![Goal::WeightLoss],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_without_key_uses_fallback_and_skips_transport() {
        let transport = FakeTransport::new(Reply::Content(AI_PROGRAM.to_string()));
        let generator = ProgramGenerator::new(config(None), transport.clone());

        let program = generator.generate_program(&alex()).await;

        assert_eq!(transport.calls(), 0);
        assert_eq!(program.name, "Programme weight_loss pour Alex");
        assert_eq!(program.workouts.len(), 3);
        assert_eq!(program.frequency, Some(3));
        assert_eq!(program.duration, Some(12));
        assert!(!program.generated_by_ai);
    }

    #[tokio::test]
    async fn test_valid_response_is_stamped_and_otherwise_unchanged() {
        let transport = FakeTransport::new(Reply::Content(format!("```json\n{}\n```", AI_PROGRAM)));
        let generator = ProgramGenerator::new(config(Some("gsk_live")), transport.clone());

        let program = generator.generate_program(&alex()).await;

        let mut expected: GeneratedProgram = serde_json::from_str(AI_PROGRAM).unwrap();
        expected.generated_by_ai = true;
        expected.ai_model = Some("llama-3.3-70b-versatile".to_string());
        assert_eq!(program, expected);
        assert_eq!(program.workouts[1].exercises[0].reps, "12");
    }

    #[tokio::test]
    async fn test_request_shape() {
        let transport = FakeTransport::new(Reply::Content(AI_PROGRAM.to_string()));
        let generator = ProgramGenerator::new(config(Some("gsk_live")), transport.clone());

        generator.generate_program(&alex()).await;

        let requests = transport.requests.lock().unwrap();
        let (api_key, request) = &requests[0];
        assert_eq!(api_key, "gsk_live");
        assert_eq!(request.model, "llama-3.3-70b-versatile");
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 2000);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[0].content, ai_prompt::SYSTEM_INSTRUCTION);
        assert_eq!(request.messages[1].role, "user");
        assert!(request.messages[1].content.contains("- Nom: Alex"));

        let body = serde_json::to_value(request).unwrap();
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["max_tokens"], 2000);
    }

    #[tokio::test]
    async fn test_non_json_response_falls_back() {
        let transport = FakeTransport::new(Reply::Content(
            "Désolé, je ne peux pas répondre en JSON.".to_string(),
        ));
        let generator = ProgramGenerator::new(config(Some("gsk_live")), transport.clone());

        let program = generator.generate_program(&alex()).await;

        assert_eq!(transport.calls(), 1);
        assert!(!program.generated_by_ai);
        assert!(program.ai_model.is_none());
        assert_eq!(program.name, "Programme weight_loss pour Alex");
    }

    #[tokio::test]
    async fn test_transport_failure_falls_back_without_retry() {
        let transport = FakeTransport::new(Reply::Failure);
        let generator = ProgramGenerator::new(config(Some("gsk_live")), transport.clone());

        let program = generator.generate_program(&alex()).await;

        assert_eq!(transport.calls(), 1);
        assert!(!program.generated_by_ai);
        assert_eq!(program.workouts.len(), 3);
    }

    #[tokio::test]
    async fn test_missing_choice_falls_back() {
        let transport = FakeTransport::new(Reply::NoChoices);
        let generator = ProgramGenerator::new(config(Some("gsk_live")), transport);

        let program = generator.generate_program(&alex()).await;

        assert!(!program.generated_by_ai);
    }

    #[tokio::test]
    async fn test_shape_violation_falls_back() {
        let transport = FakeTransport::new(Reply::Content(
            r#"{"programme": "mauvais format"}"#.to_string(),
        ));
        let generator = ProgramGenerator::new(config(Some("gsk_live")), transport);

        let program = generator.generate_program(&alex()).await;

        assert!(!program.generated_by_ai);
        assert!(
            program
                .workouts
                .iter()
                .all(|w: &GeneratedWorkout| w.focus.as_deref() == Some("Corps entier"))
        );
    }

    #[test]
    fn test_blank_key_selects_local_strategy() {
        let transport = FakeTransport::new(Reply::Failure);
        let generator = ProgramGenerator::new(config(Some("  ")), transport);
        assert_eq!(generator.strategy(), GenerationStrategy::Local);

        let transport = FakeTransport::new(Reply::Failure);
        let generator = ProgramGenerator::new(config(Some("k")), transport);
        assert_eq!(
            generator.strategy(),
            GenerationStrategy::Remote { api_key: "k" }
        );
    }
}
