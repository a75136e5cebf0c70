//! Resilient generation client wrapper with exponential backoff retry.
//!
//! Wraps any [`GenerationPort`] implementation with retry logic to handle
//! transient failures of the generation collaborator.

use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::ports::{GenerationError, GenerationPort, GenerationRequest};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (0 = no retries, just the initial attempt)
    pub max_retries: u32,
    /// Base delay in milliseconds before first retry
    pub base_delay_ms: u64,
    /// Maximum delay in milliseconds (caps exponential growth)
    pub max_delay_ms: u64,
    /// Jitter factor (0.0-1.0) for randomizing delays to prevent thundering herd
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30000,
            jitter_factor: 0.2,
        }
    }
}

/// Wrapper that adds retry logic to any generation client
pub struct ResilientGenerationClient {
    inner: Arc<dyn GenerationPort>,
    config: RetryConfig,
}

impl ResilientGenerationClient {
    /// Create a new resilient wrapper around an existing generation client
    pub fn new(inner: Arc<dyn GenerationPort>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// Calculate delay for a given attempt number using exponential backoff with jitter
    fn calculate_delay(&self, attempt: u32) -> u64 {
        let base = self.config.base_delay_ms;
        let exponential = base.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
        let capped = exponential.min(self.config.max_delay_ms);

        let jitter_range = (capped as f64 * self.config.jitter_factor) as i64;
        if jitter_range > 0 {
            let jitter = rand::thread_rng().gen_range(-jitter_range..=jitter_range);
            (capped as i64 + jitter).max(0) as u64
        } else {
            capped
        }
    }

    /// Determine if an error is retryable
    fn is_retryable(error: &GenerationError) -> bool {
        match error {
            // Network/request failures are typically transient
            GenerationError::RequestFailed(msg) => {
                // Don't retry on auth errors or bad requests
                !msg.contains("401")
                    && !msg.contains("403")
                    && !msg.contains("400")
                    && !msg.contains("Invalid")
            }
            // Invalid response could be transient (malformed response due to network issues)
            GenerationError::InvalidResponse(_) => true,
        }
    }
}

#[async_trait]
impl GenerationPort for ResilientGenerationClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match self.inner.generate(request.clone()).await {
                Ok(response) => {
                    if attempt > 0 {
                        tracing::info!(
                            attempt = attempt + 1,
                            "Generation request succeeded after retry"
                        );
                    }
                    return Ok(response);
                }
                Err(e) => {
                    let is_retryable = Self::is_retryable(&e);

                    if attempt < self.config.max_retries && is_retryable {
                        let delay = self.calculate_delay(attempt + 1);
                        tracing::warn!(
                            attempt = attempt + 1,
                            max_retries = self.config.max_retries,
                            delay_ms = delay,
                            error = %e,
                            "Generation request failed, retrying..."
                        );
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                    } else if !is_retryable {
                        tracing::error!(
                            error = %e,
                            "Generation request failed with non-retryable error"
                        );
                        return Err(e);
                    }

                    last_error = Some(e);
                }
            }
        }

        let error = last_error
            .unwrap_or_else(|| GenerationError::RequestFailed("Unknown error".to_string()));
        tracing::error!(
            max_retries = self.config.max_retries,
            error = %error,
            "Generation request exhausted all retries"
        );
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config() -> RetryConfig {
        RetryConfig {
            max_retries: 2,
            base_delay_ms: 1,
            max_delay_ms: 2,
            jitter_factor: 0.0,
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let inner = Arc::new(CountingGeneration::new(2));
        let client = ResilientGenerationClient::new(inner.clone(), fast_config());

        let result = client.generate(GenerationRequest::new("ctx")).await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let inner = Arc::new(CountingGeneration::new(10));
        let client = ResilientGenerationClient::new(inner.clone(), fast_config());

        let result = client.generate(GenerationRequest::new("ctx")).await;
        assert!(result.is_err());
        // Initial attempt + 2 retries
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_fails_immediately() {
        struct AuthFailure;

        #[async_trait]
        impl GenerationPort for AuthFailure {
            async fn generate(
                &self,
                _request: GenerationRequest,
            ) -> Result<String, GenerationError> {
                Err(GenerationError::RequestFailed("401 unauthorized".into()))
            }
        }

        let client = ResilientGenerationClient::new(Arc::new(AuthFailure), fast_config());
        let result = client.generate(GenerationRequest::new("ctx")).await;
        assert!(result.is_err());
    }

    /// Generation stub that fails `failures` times, then returns "ok".
    struct CountingGeneration {
        failures: u32,
        calls: AtomicU32,
    }

    impl CountingGeneration {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl GenerationPort for CountingGeneration {
        async fn generate(&self, _request: GenerationRequest) -> Result<String, GenerationError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(GenerationError::InvalidResponse("truncated".into()))
            } else {
                Ok("ok".to_string())
            }
        }
    }
}
