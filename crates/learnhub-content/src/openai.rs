//! Content generator backed by an OpenAI-compatible chat completions API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use learnhub_core::config::generator::GeneratorConfig;
use learnhub_core::error::{AppError, ErrorKind};
use learnhub_core::result::AppResult;
use learnhub_core::traits::generator::ContentGenerator;
use learnhub_core::types::Prompt;

/// Generator that calls `{base_url}/chat/completions` in JSON mode.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    http: reqwest::Client,
    config: GeneratorConfig,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiGenerator {
    /// Create a generator from configuration.
    pub fn new(config: &GeneratorConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        info!(model = %config.model, base_url = %config.base_url, "Content generator configured");
        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    fn api_key(&self) -> AppResult<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AppError::configuration("No API key configured for the content generator"))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn map_err(e: reqwest::Error) -> AppError {
        AppError::with_source(
            ErrorKind::ExternalService,
            format!("Content generator request failed: {e}"),
            e,
        )
    }
}

#[async_trait]
impl ContentGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &Prompt) -> AppResult<Value> {
        let api_key = self.api_key()?;
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: prompt.temperature,
            max_tokens: prompt.max_tokens,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response: ChatResponse = self
            .http
            .post(self.url("chat/completions"))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(Self::map_err)?
            .error_for_status()
            .map_err(Self::map_err)?
            .json()
            .await
            .map_err(Self::map_err)?;

        parse_completion(response)
    }

    async fn check_connection(&self) -> AppResult<bool> {
        let api_key = self.api_key()?;
        let response = self
            .http
            .get(self.url("models"))
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(Self::map_err)?;

        debug!(status = %response.status(), "Content generator connection check");
        Ok(response.status().is_success())
    }
}

/// Extract and parse the JSON document from the first choice.
fn parse_completion(response: ChatResponse) -> AppResult<Value> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| AppError::external_service("Content generator returned no choices"))?;

    let value: Value = serde_json::from_str(&content)?;
    if !value.is_object() {
        return Err(AppError::external_service(
            "Content generator returned JSON that is not an object",
        ));
    }
    Ok(value)
}
