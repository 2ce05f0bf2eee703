//! Sentinel LLM Provider Layer
//!
//! Implementations of the `SearchProvider` trait from `sentinel-domain`.
//!
//! # Architecture
//!
//! The pipeline only ever asks one question of a provider: given a system
//! prompt and a user prompt, what text did the model answer with? Transient
//! rate limiting is reported as a distinct error so the caller can back off
//! and retry; providers never retry on their own.
//!
//! # Providers
//!
//! - `MockProvider`: Scripted replies for testing
//! - `AnthropicProvider`: Anthropic Messages API with the web search tool
//!
//! # Examples
//!
//! ```
//! use sentinel_llm::MockProvider;
//! use sentinel_domain::traits::SearchProvider;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = MockProvider::new("[]");
//! let reply = provider.search("system", "user").await.unwrap();
//! assert_eq!(reply, "[]");
//! # }
//! ```

#![warn(missing_docs)]

pub mod anthropic;

use sentinel_domain::traits::SearchProvider;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use anthropic::{AnthropicConfig, AnthropicProvider};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Credentials rejected
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider could not be configured
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether this error is a retryable rate-limit signal
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, LlmError::RateLimitExceeded)
    }
}

/// A single recorded `search` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCall {
    /// System prompt sent
    pub system_prompt: String,
    /// User prompt sent
    pub user_prompt: String,
}

/// Mock search provider for deterministic testing
///
/// Replies are served from a script first, then from the fixed default
/// response once the script runs out. Every call is recorded so tests can
/// inspect the prompts the pipeline built.
///
/// # Examples
///
/// ```
/// use sentinel_llm::{LlmError, MockProvider};
///
/// let provider = MockProvider::new("[]");
/// provider.push_error(LlmError::RateLimitExceeded);
/// provider.push_response(r#"[{"title": "X"}]"#);
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    script: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
    calls: Arc<Mutex<Vec<SearchCall>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for unscripted calls
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful reply
    pub fn push_response(&self, response: impl Into<String>) {
        self.script.lock().unwrap().push_back(Ok(response.into()));
    }

    /// Queue a failure
    pub fn push_error(&self, error: LlmError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// Queue `count` consecutive rate-limit failures
    pub fn push_rate_limits(&self, count: usize) {
        let mut script = self.script.lock().unwrap();
        for _ in 0..count {
            script.push_back(Err(LlmError::RateLimitExceeded));
        }
    }

    /// Get the number of times search was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All recorded calls, oldest first
    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The most recent call, if any
    pub fn last_call(&self) -> Option<SearchCall> {
        self.calls.lock().unwrap().last().cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("[]")
    }
}

impl SearchProvider for MockProvider {
    type Error = LlmError;

    async fn search(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(SearchCall {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
        });

        let scripted = self.script.lock().unwrap().pop_front();
        match scripted {
            Some(reply) => reply,
            None => Ok(self.default_response.clone()),
        }
    }

    fn is_rate_limited(error: &LlmError) -> bool {
        error.is_rate_limited()
    }
}
