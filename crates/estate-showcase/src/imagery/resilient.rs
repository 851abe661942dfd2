use std::time::Duration;

use tracing::{debug, error, warn};

use super::generator::{ApiCredential, ImageGenerator};
use super::outcome::FetchOutcome;
use crate::config::ImageryConfig;

/// Bounded exponential backoff applied to rate-limited calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(5);

    /// `max_attempts` counts the first call and is at least one.
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait before the retry that follows `attempt` (1-based): the initial
    /// delay, doubled for every earlier retry.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1).min(31);
        self.initial_delay.saturating_mul(1 << doublings)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_INITIAL_DELAY)
    }
}

/// Fetches one listing photo, absorbing every failure into a placeholder.
#[derive(Debug)]
pub struct ResilientImageClient<G> {
    generator: G,
    credential: Option<ApiCredential>,
    policy: RetryPolicy,
}

impl<G> ResilientImageClient<G>
where
    G: ImageGenerator,
{
    pub fn new(generator: G, credential: Option<ApiCredential>, policy: RetryPolicy) -> Self {
        Self {
            generator,
            credential,
            policy,
        }
    }

    pub fn from_config(generator: G, config: &ImageryConfig) -> Self {
        let credential = config.api_key.clone().map(ApiCredential::new);
        if credential.is_none() {
            warn!("API_KEY is not set; listing photos will use placeholder images");
        }
        Self::new(
            generator,
            credential,
            RetryPolicy::new(config.max_attempts, config.initial_backoff),
        )
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Resolve a photo for `prompt`. Never fails: without a credential, on a
    /// non-retriable error, or once rate-limit retries are exhausted, the
    /// result is a fresh placeholder.
    pub async fn fetch(&self, prompt: &str) -> FetchOutcome {
        let Some(credential) = self.credential.as_ref() else {
            debug!("no credential configured; using placeholder image");
            return FetchOutcome::placeholder();
        };

        let max_attempts = self.policy.max_attempts();
        for attempt in 1..=max_attempts {
            match self.generator.generate(credential, prompt).await {
                Ok(image) => {
                    debug!(attempt, "image generated");
                    return FetchOutcome::Image(image.data_uri());
                }
                Err(err) if err.is_rate_limited() && attempt < max_attempts => {
                    let delay = self.policy.delay_after(attempt);
                    warn!(
                        attempt,
                        max_attempts,
                        delay_secs = delay.as_secs_f64(),
                        "rate limit hit; retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    error!(
                        attempt,
                        max_attempts,
                        error = %err,
                        "image generation failed; using placeholder image"
                    );
                    return FetchOutcome::placeholder();
                }
            }
        }

        FetchOutcome::placeholder()
    }
}
