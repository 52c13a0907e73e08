/// LLM Client — the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call the chat-completions API directly.
/// All generation goes through the `TextGenerator` trait defined here.
///
/// One request, one response: no streaming, no retries, no client-side timeout.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Model parameters shared by every call site. Loaded from config at startup.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
}

/// A single prompt plus the model parameters it is sent with. Not persisted.
#[derive(Debug, Clone)]
pub struct GenerationRequest<'a> {
    pub prompt: &'a str,
    pub model: &'a str,
    pub temperature: f32,
}

impl GenerationSettings {
    pub fn request<'a>(&'a self, prompt: &'a str) -> GenerationRequest<'a> {
        GenerationRequest {
            prompt,
            model: &self.model,
            temperature: self.temperature,
        }
    }
}

/// Anything that can turn a prompt into generated text.
/// `LlmClient` is the production implementation; tests swap in scripted doubles.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Extracts the text content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for an OpenAI-compatible chat-completions endpoint (Groq by default).
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_url: String, api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_url,
            api_key,
        })
    }

    /// Makes a raw call to the chat-completions API, returning the full response object.
    pub async fn call(
        &self,
        request: &GenerationRequest<'_>,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let body = build_request_body(request);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        let text = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&text)?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(parsed)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, LlmError> {
        let response = self.call(request).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

fn build_request_body<'a>(request: &GenerationRequest<'a>) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model: request.model,
        messages: vec![ChatMessage {
            role: "user",
            content: request.prompt,
        }],
        temperature: request.temperature,
    }
}

/// Pulls `error.message` out of a provider error body, falling back to the raw body.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}
