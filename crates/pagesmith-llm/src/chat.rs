//! OpenAI-compatible chat completions provider
//!
//! Speaks the `POST {base_url}/chat/completions` envelope used by most hosted
//! model APIs (Zhipu GLM, OpenAI, DeepSeek, local gateways).
//!
//! # Features
//!
//! - Async HTTP communication with bearer-token auth
//! - Configurable endpoint, model and token limit
//! - Exactly one request per call; retries live in [`crate::RetryingClient`]
//!
//! # Examples
//!
//! ```no_run
//! use pagesmith_llm::ChatCompletionsProvider;
//!
//! let provider = ChatCompletionsProvider::new(
//!     "https://open.bigmodel.cn/api/paas/v4",
//!     "my-api-key",
//!     "glm-4.5-flash",
//! ).unwrap();
//! ```

use crate::LlmError;
use pagesmith_domain::{CompletionProvider, CompletionRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default chat completions base URL
pub const DEFAULT_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "glm-4.5-flash";

/// Default TCP connect timeout (10 seconds)
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Longest error body kept in [`LlmError::Http`]
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Chat completions provider
pub struct ChatCompletionsProvider {
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: Option<u32>,
    client: reqwest::Client,
}

/// Request body for the chat completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the chat completions API
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `base_url`: API root, without the `/chat/completions` suffix
    /// - `api_key`: bearer token
    /// - `model`: model identifier (e.g. "glm-4.5-flash")
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Config`] if the key is empty or the HTTP client
    /// cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Config("API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
            max_tokens: None,
            client,
        })
    }

    /// Create a provider against [`DEFAULT_BASE_URL`] with [`DEFAULT_MODEL`]
    pub fn default_endpoint(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_BASE_URL, api_key, DEFAULT_MODEL)
    }

    /// Cap the number of generated tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Replace the underlying HTTP client (custom proxies, TLS roots, ...)
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Full URL of the completions endpoint
    pub fn endpoint_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request_body<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            temperature: request.temperature,
            stream: false,
            max_tokens: self.max_tokens,
        }
    }
}

impl CompletionProvider for ChatCompletionsProvider {
    type Error = LlmError;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let url = self.endpoint_url();
        let body = self.request_body(request);

        debug!(
            "POST {} (model {}, prompt {} chars)",
            url,
            self.model,
            request.system_prompt.chars().count() + request.user_prompt.chars().count()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Http {
                status: status.as_u16(),
                body: error_text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Communication(format!("Failed to read body: {}", e)))?;

        parse_reply(&text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Pull the reply text out of a chat completions response body
pub fn parse_reply(body: &str) -> Result<String, LlmError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("Response has no message content".to_string()))
}
