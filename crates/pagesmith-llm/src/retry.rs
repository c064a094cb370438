//! Bounded retries with exponential backoff
//!
//! [`RetryingClient`] wraps any provider whose error type is [`LlmError`].
//! Each attempt gets its own timeout; failed attempts are followed by a sleep
//! of `base_delay × multiplier^attempt_index`; when attempts (or the optional
//! overall deadline) run out the client fails with [`LlmError::Unavailable`].

use crate::LlmError;
use pagesmith_domain::{CompletionProvider, CompletionRequest};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, warn};

/// Retry configuration for completion calls
///
/// # Examples
///
/// ```
/// use pagesmith_llm::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts, 3);
/// assert_eq!(policy.backoff_delay(0), Duration::from_millis(800));
/// assert_eq!(policy.backoff_delay(1), Duration::from_millis(1600));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first one (>= 1)
    pub max_attempts: u32,

    /// Delay after the first failed attempt (milliseconds)
    pub base_delay_ms: u64,

    /// Growth factor applied per further attempt (>= 1.0)
    pub multiplier: f64,

    /// Upper bound for any single backoff delay (milliseconds)
    pub max_delay_ms: u64,

    /// Time budget of each individual attempt (milliseconds)
    pub attempt_timeout_ms: u64,

    /// Budget for all attempts and sleeps together (milliseconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_ms: Option<u64>,

    /// Random extra delay as a fraction of the computed delay (0.0 disables)
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 800,
            multiplier: 2.0,
            max_delay_ms: 30_000,
            attempt_timeout_ms: 60_000,
            deadline_ms: None,
            jitter: 0.0,
        }
    }
}

impl RetryPolicy {
    /// Set the attempt budget
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the base backoff delay
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the backoff multiplier
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Set the per-attempt timeout
    pub fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout_ms = attempt_timeout.as_millis() as u64;
        self
    }

    /// Set the overall deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_ms = Some(deadline.as_millis() as u64);
        self
    }

    /// Set the jitter fraction
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    /// Per-attempt timeout as a Duration
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    /// Overall deadline as a Duration
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    /// Backoff before the attempt following `attempt_index` (0-based), without jitter
    pub fn backoff_delay(&self, attempt_index: u32) -> Duration {
        let exponent = attempt_index.min(i32::MAX as u32) as i32;
        let millis = self.base_delay_ms as f64 * self.multiplier.powi(exponent);
        let capped = millis.min(self.max_delay_ms as f64).max(0.0);
        Duration::from_millis(capped as u64)
    }

    /// Backoff with jitter applied; jitter only ever lengthens the delay
    fn jittered_delay(&self, attempt_index: u32) -> Duration {
        let delay = self.backoff_delay(attempt_index);
        if self.jitter <= 0.0 {
            return delay;
        }
        let factor: f64 = rand::thread_rng().gen_range(0.0..1.0);
        delay + delay.mul_f64(self.jitter * factor)
    }

    /// Validate the policy
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".to_string());
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err("multiplier must be a finite number >= 1.0".to_string());
        }
        if self.attempt_timeout_ms == 0 {
            return Err("attempt_timeout_ms must be greater than 0".to_string());
        }
        if !self.jitter.is_finite() || !(0.0..=1.0).contains(&self.jitter) {
            return Err("jitter must be between 0.0 and 1.0".to_string());
        }
        if self.deadline_ms == Some(0) {
            return Err("deadline_ms must be greater than 0 when set".to_string());
        }
        Ok(())
    }
}

/// A successful completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Raw reply text
    pub text: String,

    /// Attempts used, including the successful one
    pub attempts: u32,
}

/// Completion client with bounded retries
///
/// The client never touches caller state: it returns raw text or fails.
pub struct RetryingClient<P> {
    provider: P,
    policy: RetryPolicy,
}

impl<P> RetryingClient<P>
where
    P: CompletionProvider<Error = LlmError> + Send + Sync,
{
    /// Wrap a provider
    pub fn new(provider: P, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    /// The wrapped provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The active policy
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Model identifier of the wrapped provider
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Call the provider until it answers or the budget is spent
    ///
    /// # Errors
    ///
    /// Always [`LlmError::Unavailable`], carrying the number of attempts made
    /// and the last underlying failure. A disabled provider fails with zero
    /// attempts and no sleeping.
    pub async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        if !self.provider.is_enabled() {
            return Err(LlmError::Unavailable {
                attempts: 0,
                reason: "provider is disabled".to_string(),
            });
        }

        let max_attempts = self.policy.max_attempts.max(1);
        let deadline = self.policy.deadline().map(|budget| Instant::now() + budget);
        let mut attempts = 0;
        let mut last_error: Option<LlmError> = None;

        for attempt_index in 0..max_attempts {
            let mut attempt_timeout = self.policy.attempt_timeout();
            if let Some(deadline) = deadline {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    debug!("Completion deadline reached before attempt {}", attempt_index + 1);
                    break;
                }
                attempt_timeout = attempt_timeout.min(remaining);
            }

            attempts += 1;
            let outcome = match timeout(attempt_timeout, self.provider.complete(request)).await {
                Ok(result) => result,
                Err(_) => Err(LlmError::Timeout(attempt_timeout)),
            };

            match outcome {
                Ok(text) => {
                    debug!(
                        "Completion succeeded on attempt {}/{} ({} chars)",
                        attempts,
                        max_attempts,
                        text.chars().count()
                    );
                    return Ok(Completion { text, attempts });
                }
                Err(error) if !error.is_retryable() => {
                    warn!("Completion attempt {} failed permanently: {}", attempts, error);
                    last_error = Some(error);
                    break;
                }
                Err(error) => {
                    warn!(
                        "Completion attempt {}/{} failed: {}",
                        attempts, max_attempts, error
                    );
                    last_error = Some(error);
                }
            }

            if attempts < max_attempts {
                let delay = self.policy.jittered_delay(attempt_index);
                if let Some(deadline) = deadline {
                    if Instant::now() + delay >= deadline {
                        debug!("Backoff of {:?} would pass the deadline, giving up", delay);
                        break;
                    }
                }
                sleep(delay).await;
            }
        }

        Err(LlmError::Unavailable {
            attempts,
            reason: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "deadline exceeded".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DisabledProvider, MockProvider};
    use std::time::Instant as StdInstant;

    fn request() -> CompletionRequest {
        CompletionRequest::new("system", "user")
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_attempts(max_attempts)
            .with_base_delay(Duration::from_millis(20))
            .with_multiplier(2.0)
            .with_attempt_timeout(Duration::from_millis(200))
    }

    #[test]
    fn test_default_policy_is_valid() {
        assert!(RetryPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_policies() {
        assert!(RetryPolicy::default().with_max_attempts(0).validate().is_err());
        assert!(RetryPolicy::default().with_multiplier(0.5).validate().is_err());
        assert!(RetryPolicy::default().with_multiplier(f64::NAN).validate().is_err());
        assert!(RetryPolicy::default().with_jitter(1.5).validate().is_err());
        assert!(RetryPolicy::default()
            .with_attempt_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn test_backoff_grows_exponentially() {
        let policy = RetryPolicy::default()
            .with_base_delay(Duration::from_millis(100))
            .with_multiplier(3.0);
        assert_eq!(policy.backoff_delay(0), Duration::from_millis(100));
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(300));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(900));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy::default().with_base_delay(Duration::from_secs(10));
        assert_eq!(policy.backoff_delay(10), Duration::from_millis(30_000));
    }

    #[test]
    fn test_jitter_never_shortens_delay() {
        let policy = fast_policy(3).with_jitter(0.5);
        for _ in 0..50 {
            let delay = policy.jittered_delay(1);
            assert!(delay >= Duration::from_millis(40));
            assert!(delay <= Duration::from_millis(60));
        }
    }

    #[test]
    fn test_policy_missing_fields_default() {
        let policy: RetryPolicy =
            serde_json::from_str(r#"{"max_attempts":2,"base_delay_ms":10}"#).unwrap();
        assert_eq!(policy.multiplier, 2.0);
        assert_eq!(policy.attempt_timeout_ms, 60_000);
        assert_eq!(policy.max_delay_ms, 30_000);
        assert_eq!(policy.deadline_ms, None);
        assert_eq!(policy.jitter, 0.0);
    }

    #[tokio::test]
    async fn test_first_attempt_success() {
        let client = RetryingClient::new(MockProvider::new("ok"), fast_policy(3));
        let completion = client.complete(&request()).await.unwrap();
        assert_eq!(completion.text, "ok");
        assert_eq!(completion.attempts, 1);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let provider = MockProvider::new("recovered");
        provider.push_error(LlmError::Communication("reset".to_string()));
        provider.push_error(LlmError::Http { status: 502, body: String::new() });

        let client = RetryingClient::new(provider.clone(), fast_policy(3));
        let completion = client.complete(&request()).await.unwrap();

        assert_eq!(completion.text, "recovered");
        assert_eq!(completion.attempts, 3);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_makes_exactly_max_attempts() {
        let provider = MockProvider::failing(LlmError::Http {
            status: 503,
            body: "down".to_string(),
        });
        let policy = fast_policy(3);
        let expected_sleep = policy.backoff_delay(0) + policy.backoff_delay(1);
        let client = RetryingClient::new(provider.clone(), policy);

        let started = StdInstant::now();
        let result = client.complete(&request()).await;
        let elapsed = started.elapsed();

        match result {
            Err(LlmError::Unavailable { attempts, reason }) => {
                assert_eq!(attempts, 3);
                assert!(reason.contains("503"));
            }
            other => panic!("Expected Unavailable, got {:?}", other),
        }
        assert_eq!(provider.call_count(), 3);
        assert!(elapsed >= expected_sleep, "elapsed {:?} < {:?}", elapsed, expected_sleep);
    }

    #[tokio::test]
    async fn test_attempt_timeout_counts_as_failure() {
        let provider = MockProvider::new("fast answer");
        provider.push_delayed(Duration::from_secs(5), "too slow");

        let policy = fast_policy(2).with_attempt_timeout(Duration::from_millis(50));
        let client = RetryingClient::new(provider.clone(), policy);
        let completion = client.complete(&request()).await.unwrap();

        assert_eq!(completion.text, "fast answer");
        assert_eq!(completion.attempts, 2);
    }

    #[tokio::test]
    async fn test_non_retryable_error_stops_early() {
        let provider = MockProvider::failing(LlmError::InvalidResponse("garbled".to_string()));
        let client = RetryingClient::new(provider.clone(), fast_policy(5));

        let result = client.complete(&request()).await;
        assert!(matches!(result, Err(LlmError::Unavailable { attempts: 1, .. })));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_deadline_bounds_total_time() {
        let provider = MockProvider::failing(LlmError::Communication("refused".to_string()));
        let policy = fast_policy(10)
            .with_base_delay(Duration::from_millis(40))
            .with_deadline(Duration::from_millis(100));
        let client = RetryingClient::new(provider.clone(), policy);

        let started = StdInstant::now();
        let result = client.complete(&request()).await;

        assert!(matches!(result, Err(LlmError::Unavailable { .. })));
        assert!(provider.call_count() < 10);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_disabled_provider_short_circuits() {
        let client = RetryingClient::new(DisabledProvider, fast_policy(3));
        let result = client.complete(&request()).await;
        assert!(matches!(result, Err(LlmError::Unavailable { attempts: 0, .. })));
    }
}
