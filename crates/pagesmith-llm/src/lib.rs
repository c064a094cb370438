//! Pagesmith Completion Client Layer
//!
//! Implementations of the `CompletionProvider` trait from `pagesmith-domain`,
//! plus the retry layer that turns an unreliable provider into a client with
//! bounded attempts and exponential backoff.
//!
//! # Providers
//!
//! - `ChatCompletionsProvider`: OpenAI-compatible `chat/completions` endpoint
//! - `MockProvider`: Deterministic scripted provider for testing
//! - `DisabledProvider`: Stand-in used when no credential is configured
//!
//! # Examples
//!
//! ```
//! use pagesmith_domain::CompletionRequest;
//! use pagesmith_llm::{MockProvider, RetryPolicy, RetryingClient};
//!
//! # async fn example() -> Result<(), pagesmith_llm::LlmError> {
//! let client = RetryingClient::new(MockProvider::new("{}"), RetryPolicy::default());
//! let completion = client.complete(&CompletionRequest::new("system", "user")).await?;
//! assert_eq!(completion.text, "{}");
//! assert_eq!(completion.attempts, 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod chat;
pub mod retry;

use pagesmith_domain::{CompletionProvider, CompletionRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub use chat::ChatCompletionsProvider;
pub use retry::{Completion, RetryPolicy, RetryingClient};

/// Errors that can occur during completion calls
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Non-2xx status from the endpoint
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code
        status: u16,
        /// Response body (shortened)
        body: String,
    },

    /// A single attempt exceeded its time budget
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Successful status but the reply envelope could not be read
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider misconfiguration (bad URL, missing credential, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Completion calls are switched off
    #[error("Completion disabled: {0}")]
    Disabled(String),

    /// Every attempt failed, or the deadline ran out
    #[error("Service unavailable after {attempts} attempt(s): {reason}")]
    Unavailable {
        /// Attempts actually made
        attempts: u32,
        /// Description of the last failure
        reason: String,
    },
}

impl LlmError {
    /// Whether another attempt could plausibly succeed
    ///
    /// Transport errors, non-2xx responses and timeouts are retried.
    /// Everything else stops the retry loop immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::Communication(_) | LlmError::Http { .. } | LlmError::Timeout(_)
        )
    }
}

/// One scripted outcome for [`MockProvider`]
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Reply immediately with this text
    Text(String),
    /// Fail immediately with this error
    Fail(LlmError),
    /// Wait, then reply with this text
    Delayed(Duration, String),
}

/// Mock completion provider for deterministic testing
///
/// Replies are taken from a script queue first; once it is drained every
/// call gets the default reply. No network calls are made.
///
/// # Examples
///
/// ```
/// use pagesmith_domain::{CompletionProvider, CompletionRequest};
/// use pagesmith_llm::{LlmError, MockProvider};
///
/// # async fn example() {
/// let provider = MockProvider::new("default");
/// provider.push_error(LlmError::Communication("reset".to_string()));
/// provider.push_reply("scripted");
///
/// let request = CompletionRequest::new("s", "u");
/// assert!(provider.complete(&request).await.is_err());
/// assert_eq!(provider.complete(&request).await.unwrap(), "scripted");
/// assert_eq!(provider.complete(&request).await.unwrap(), "default");
/// assert_eq!(provider.call_count(), 3);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: MockReply,
    script: Arc<Mutex<VecDeque<MockReply>>>,
    call_count: Arc<Mutex<usize>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    model: String,
}

impl MockProvider {
    /// Create a MockProvider with a fixed reply for all calls
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_default(MockReply::Text(response.into()))
    }

    /// Create a MockProvider that fails every call with `error`
    pub fn failing(error: LlmError) -> Self {
        Self::with_default(MockReply::Fail(error))
    }

    fn with_default(default_reply: MockReply) -> Self {
        Self {
            default_reply,
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            model: "mock".to_string(),
        }
    }

    /// Set the reported model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Queue a successful reply
    pub fn push_reply(&self, response: impl Into<String>) {
        lock(&self.script).push_back(MockReply::Text(response.into()));
    }

    /// Queue a failure
    pub fn push_error(&self, error: LlmError) {
        lock(&self.script).push_back(MockReply::Fail(error));
    }

    /// Queue a reply that arrives after `delay`
    pub fn push_delayed(&self, delay: Duration, response: impl Into<String>) {
        lock(&self.script).push_back(MockReply::Delayed(delay, response.into()));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        *lock(&self.call_count)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *lock(&self.call_count) = 0;
    }

    /// The most recent request received
    pub fn last_request(&self) -> Option<CompletionRequest> {
        lock(&self.requests).last().cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl CompletionProvider for MockProvider {
    type Error = LlmError;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        *lock(&self.call_count) += 1;
        lock(&self.requests).push(request.clone());
        let scripted = lock(&self.script).pop_front();
        let reply = scripted.unwrap_or_else(|| self.default_reply.clone());

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Fail(error) => Err(error),
            MockReply::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Provider used when no credential is configured
///
/// Reports itself as disabled so the retry layer never calls it; calling it
/// anyway fails with [`LlmError::Disabled`].
#[derive(Debug, Clone, Default)]
pub struct DisabledProvider;

impl CompletionProvider for DisabledProvider {
    type Error = LlmError;

    async fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
        Err(LlmError::Disabled("no API key configured".to_string()))
    }

    fn model_name(&self) -> &str {
        "none"
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Lock a mutex, recovering the data if a panicking test poisoned it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
