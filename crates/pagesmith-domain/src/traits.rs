//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Implementations live in other crates.

use std::future::Future;

/// One request to a text-generation service
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Instructions and constraints for the model
    pub system_prompt: String,

    /// The page data to work on
    pub user_prompt: String,

    /// Sampling temperature
    pub temperature: f32,
}

impl CompletionRequest {
    /// Create a request with the default low temperature (0.1)
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            temperature: 0.1,
        }
    }

    /// Override the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Trait for text-generation providers
///
/// A provider performs exactly one request per call and returns the raw
/// reply text. Retries, timeouts and backoff are layered on top by the
/// infrastructure crate (pagesmith-llm), so implementations stay simple.
pub trait CompletionProvider {
    /// Error type for a single failed request
    type Error;

    /// Send one completion request
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Model identifier reported in run summaries
    fn model_name(&self) -> &str;

    /// Whether the provider can be called at all
    ///
    /// Providers without credentials return `false` so callers can skip
    /// straight to their fallback path.
    fn is_enabled(&self) -> bool {
        true
    }
}
