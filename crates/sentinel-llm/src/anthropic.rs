//! Anthropic Provider Implementation
//!
//! Sends research requests to Anthropic's Messages API with the server-side
//! web search tool enabled, and returns the text portion of the reply.
//!
//! # Features
//!
//! - Async HTTP communication with the Messages API
//! - Configurable model, token budget and web search allowance
//! - HTTP 429 surfaced as `LlmError::RateLimitExceeded` for the caller to retry
//! - Timeout handling on the HTTP client
//!
//! # Examples
//!
//! ```no_run
//! use sentinel_llm::{AnthropicConfig, AnthropicProvider};
//!
//! let config = AnthropicConfig::new("sk-ant-...", "claude-sonnet-4-5");
//! let provider = AnthropicProvider::new(config).unwrap();
//! ```

use crate::LlmError;
use reqwest::StatusCode;
use sentinel_domain::traits::SearchProvider;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Anthropic API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";

/// Default API version header
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Default timeout for a single request (web search replies are slow)
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default completion token budget
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default number of web searches the model may run per request
pub const DEFAULT_MAX_WEB_SEARCHES: u32 = 5;

/// Web search tool revision
const WEB_SEARCH_TOOL_TYPE: &str = "web_search_20250305";

/// Configuration for the Anthropic provider
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key for authentication
    pub api_key: String,

    /// Model to use (e.g. "claude-sonnet-4-5")
    pub model: String,

    /// Base URL for the API
    pub endpoint: String,

    /// API version header
    pub api_version: String,

    /// Completion token budget
    pub max_tokens: u32,

    /// Web search tool `max_uses`
    pub max_web_searches: u32,

    /// Request timeout
    pub timeout: Duration,
}

impl AnthropicConfig {
    /// Create a config with defaults for everything but key and model
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            max_web_searches: DEFAULT_MAX_WEB_SEARCHES,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set a custom endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the completion token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set how many web searches a single request may run
    pub fn with_max_web_searches(mut self, max_web_searches: u32) -> Self {
        self.max_web_searches = max_web_searches;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Anthropic Messages API provider with web search
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: reqwest::Client,
}

/// Request body for the Messages API
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
    tools: Vec<WebSearchTool>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct WebSearchTool {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'static str,
    max_uses: u32,
}

/// Response from the Messages API
#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

/// One reply segment; only `text` segments carry the answer
#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Error body returned by the API
#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Config` if the API key is empty or the HTTP client
    /// cannot be built.
    pub fn new(config: AnthropicConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Config("API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Model this provider talks to
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.endpoint.trim_end_matches('/'))
    }

    fn build_request<'a>(&'a self, system_prompt: &'a str, user_prompt: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system: system_prompt,
            messages: vec![Message {
                role: "user",
                content: user_prompt,
            }],
            tools: vec![WebSearchTool {
                kind: WEB_SEARCH_TOOL_TYPE,
                name: "web_search",
                max_uses: self.config.max_web_searches,
            }],
        }
    }

    /// Run one research request
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The API is unreachable
    /// - The request is rate limited (`RateLimitExceeded`, retryable)
    /// - The key is rejected or the model is unknown
    /// - The response body cannot be decoded
    pub async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        let request_body = self.build_request(system_prompt, user_prompt);

        debug!(
            "Sending request to {} (model {}, {} + {} prompt chars)",
            self.messages_url(),
            self.config.model,
            system_prompt.len(),
            user_prompt.len()
        );

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", &self.config.api_version)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(error_for_status(status, &body, &self.config.model));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(collect_text(&parsed.content))
    }
}

/// Concatenate every `text` segment of a reply, in order
fn collect_text(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text.as_deref())
        .collect()
}

/// Map a non-success HTTP status to an `LlmError`
fn error_for_status(status: StatusCode, body: &str, model: &str) -> LlmError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Auth(message),
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        _ => LlmError::Communication(format!("HTTP {}: {}", status, message)),
    }
}

impl SearchProvider for AnthropicProvider {
    type Error = LlmError;

    async fn search(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        self.generate(system_prompt, user_prompt).await
    }

    fn is_rate_limited(error: &LlmError) -> bool {
        error.is_rate_limited()
    }
}
