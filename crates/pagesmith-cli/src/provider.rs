//! Completion provider selection.

use crate::config::Config;
use crate::error::Result;
use pagesmith_domain::{CompletionProvider, CompletionRequest};
use pagesmith_llm::{ChatCompletionsProvider, DisabledProvider, LlmError};
use tracing::{info, warn};

/// The provider the CLI runs with.
pub enum Provider {
    /// Live OpenAI-compatible endpoint
    Chat(ChatCompletionsProvider),
    /// No credential: every run takes the fallback path
    Offline(DisabledProvider),
}

impl Provider {
    /// Build the provider described by the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let endpoint = &config.designer.endpoint;
        let Some(api_key) = config.api_key() else {
            warn!("No API key configured, running offline with heuristic fallback");
            return Ok(Provider::Offline(DisabledProvider));
        };

        let mut provider =
            ChatCompletionsProvider::new(&endpoint.base_url, api_key, &endpoint.model)?;
        if let Some(max_tokens) = endpoint.max_tokens {
            provider = provider.with_max_tokens(max_tokens);
        }
        info!("Using model '{}' at {}", endpoint.model, endpoint.base_url);
        Ok(Provider::Chat(provider))
    }
}

impl CompletionProvider for Provider {
    type Error = LlmError;

    async fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, LlmError> {
        match self {
            Provider::Chat(p) => p.complete(request).await,
            Provider::Offline(p) => p.complete(request).await,
        }
    }

    fn model_name(&self) -> &str {
        match self {
            Provider::Chat(p) => p.model_name(),
            Provider::Offline(p) => p.model_name(),
        }
    }

    fn is_enabled(&self) -> bool {
        match self {
            Provider::Chat(p) => p.is_enabled(),
            Provider::Offline(p) => p.is_enabled(),
        }
    }
}
