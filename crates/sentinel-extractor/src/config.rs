//! Configuration for the Job Runner

use crate::error::ExtractorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What a batch does when a job fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Report the failure and run the remaining jobs
    #[default]
    Continue,
    /// Stop at the first failure
    Abort,
}

/// Configuration for the Job Runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Maximum search attempts per job while rate limited (including the first)
    pub max_retries: u32,

    /// Backoff base unit in seconds; attempt `n` waits `base * 2^n`
    pub retry_base_secs: u64,

    /// Pause between consecutive jobs in a batch (seconds)
    pub delay_between_jobs_secs: u64,

    /// Batch failure policy
    pub failure_policy: FailurePolicy,
}

impl RunnerConfig {
    /// Backoff base unit as a Duration
    pub fn retry_base(&self) -> Duration {
        Duration::from_secs(self.retry_base_secs)
    }

    /// Inter-job pause as a Duration
    pub fn delay_between_jobs(&self) -> Duration {
        Duration::from_secs(self.delay_between_jobs_secs)
    }

    /// Wait before retry number `attempt` (zero-based)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u64.checked_pow(attempt).unwrap_or(u64::MAX);
        Duration::from_secs(self.retry_base_secs.saturating_mul(factor))
    }

    /// Set the failure policy
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.max_retries == 0 {
            return Err(ExtractorError::Config(
                "max_retries must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_base_secs: 30,
            delay_between_jobs_secs: 60,
            failure_policy: FailurePolicy::Continue,
        }
    }
}
