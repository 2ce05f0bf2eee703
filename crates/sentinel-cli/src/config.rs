//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use sentinel_domain::Job;
use sentinel_extractor::{FailurePolicy, RunnerConfig};
use sentinel_llm::anthropic::{DEFAULT_MAX_TOKENS, DEFAULT_MAX_WEB_SEARCHES};
use sentinel_llm::AnthropicConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

/// Default configuration file name, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "sentinel.config.yaml";

/// Environment variable holding the Anthropic API key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Sentinel configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentinelConfig {
    /// Model and pacing settings
    pub api: ApiConfig,

    /// Jobs, in execution order
    #[serde(default)]
    pub jobs: Vec<Job>,
}

/// The `api` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Search provider name
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Pause between jobs in seconds
    #[serde(default = "default_delay_between_jobs")]
    pub delay_between_jobs: u64,

    /// Search attempts per job while rate limited
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff base unit in seconds
    #[serde(default = "default_retry_base_secs")]
    pub retry_base_secs: u64,

    /// Reply token limit
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Web searches the model may run per call
    #[serde(default = "default_max_web_searches")]
    pub max_web_searches: u32,

    /// Stop the batch at the first failed job
    #[serde(default)]
    pub fail_fast: bool,
}

/// Supported search providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Anthropic Messages API with the web search tool
    Anthropic,
}

impl ProviderKind {
    /// Parse a provider name, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "anthropic" => Some(ProviderKind::Anthropic),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Anthropic => write!(f, "anthropic"),
        }
    }
}

/// Credentials resolved once at startup.
#[derive(Clone)]
pub struct ApiCredentials {
    api_key: String,
}

impl ApiCredentials {
    /// Wrap an API key, rejecting blank values.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        match api_key {
            Some(key) if !key.trim().is_empty() => Ok(Self {
                api_key: key.trim().to_string(),
            }),
            _ => Err(CliError::Config(format!(
                "No API key. Set {} in the environment or a .env file, or pass --api-key",
                API_KEY_ENV
            ))),
        }
    }

    /// The API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials").field("api_key", &"<redacted>").finish()
    }
}

impl SentinelConfig {
    /// Load configuration from `path`.
    ///
    /// Files ending in `.toml` are parsed as TOML, everything else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::Config(format!(
                "Config file not found: {} (run 'sentinel init' to create one)",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        Self::parse(&contents, is_toml(path))
    }

    /// Parse configuration text.
    pub fn parse(contents: &str, toml: bool) -> Result<Self> {
        let config = if toml {
            toml::from_str(contents)?
        } else {
            serde_yaml::from_str(contents)?
        };
        Ok(config)
    }

    /// Check the configuration before any job runs.
    pub fn validate(&self) -> Result<()> {
        self.provider()?;

        if self.api.model.trim().is_empty() {
            return Err(CliError::Config("api.model must not be empty".into()));
        }
        self.runner_config().validate()?;
        if self.jobs.is_empty() {
            return Err(CliError::Config("No jobs configured".into()));
        }

        let mut names = HashSet::new();
        for (index, job) in self.jobs.iter().enumerate() {
            if job.name.trim().is_empty() {
                return Err(CliError::Config(format!("Job {} has no name", index + 1)));
            }
            if job.instruction.trim().is_empty() {
                return Err(CliError::Config(format!("Job '{}' has no instruction", job.name)));
            }
            if job.file_path.as_os_str().is_empty() {
                return Err(CliError::Config(format!("Job '{}' has no file_path", job.name)));
            }
            if !names.insert(job.name.as_str()) {
                return Err(CliError::Config(format!("Duplicate job name '{}'", job.name)));
            }
        }

        Ok(())
    }

    /// The configured provider.
    pub fn provider(&self) -> Result<ProviderKind> {
        ProviderKind::parse(&self.api.provider).ok_or_else(|| {
            CliError::Config(format!(
                "Unsupported provider '{}' (supported: anthropic)",
                self.api.provider
            ))
        })
    }

    /// Runner settings derived from the `api` section.
    pub fn runner_config(&self) -> RunnerConfig {
        let failure_policy = if self.api.fail_fast {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Continue
        };

        RunnerConfig {
            max_retries: self.api.max_retries,
            retry_base_secs: self.api.retry_base_secs,
            delay_between_jobs_secs: self.api.delay_between_jobs,
            failure_policy,
        }
    }

    /// Provider settings for the Anthropic client.
    pub fn anthropic_config(&self, credentials: &ApiCredentials) -> AnthropicConfig {
        AnthropicConfig::new(credentials.api_key(), self.api.model.trim())
            .with_max_tokens(self.api.max_tokens)
            .with_max_web_searches(self.api.max_web_searches)
    }

    /// Jobs selected by name, in configuration order.
    ///
    /// An empty selection means every job.
    pub fn select_jobs(&self, names: &[String]) -> Result<Vec<Job>> {
        if names.is_empty() {
            return Ok(self.jobs.clone());
        }

        if let Some(unknown) = names.iter().find(|n| !self.jobs.iter().any(|j| &j.name == *n)) {
            return Err(CliError::InvalidInput(format!("Unknown job '{}'", unknown)));
        }

        Ok(self
            .jobs
            .iter()
            .filter(|job| names.contains(&job.name))
            .cloned()
            .collect())
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

fn default_delay_between_jobs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_secs() -> u64 {
    30
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_max_web_searches() -> u32 {
    DEFAULT_MAX_WEB_SEARCHES
}

/// Sample configuration written by `sentinel init`.
pub const SAMPLE_CONFIG: &str = r#"# Sentinel configuration
#
# The API key is read from the ANTHROPIC_API_KEY environment variable.

api:
  provider: anthropic
  model: claude-sonnet-4-5
  # Seconds to wait between jobs
  delay_between_jobs: 60
  # Attempts per job while rate limited; waits grow as retry_base_secs * 2^n
  max_retries: 3
  retry_base_secs: 30
  max_tokens: 4096
  max_web_searches: 5
  # Stop at the first failed job instead of running the rest
  fail_fast: false

jobs:
  - name: recent-news
    instruction: >-
      Find recent news articles about open-source Rust tooling published in
      the last month.
    file_path: content/news.json
    schema:
      type: array
      items:
        title: string
        date: YYYY-MM-DD
        url: string
    output_format: json

  - name: conference-talks
    instruction: Find upcoming conference talks about Rust.
    file_path: content/talks.yaml
    schema:
      type: array
      items:
        title: string
        speaker: string
        date: YYYY-MM-DD
        image: example.png
    output_format: yaml
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_domain::OutputFormat;
    use std::time::Duration;

    fn sample() -> SentinelConfig {
        SentinelConfig::parse(SAMPLE_CONFIG, false).unwrap()
    }

    #[test]
    fn test_sample_config_is_valid() {
        let config = sample();
        config.validate().unwrap();
        assert_eq!(config.jobs.len(), 2);
        assert_eq!(config.jobs[1].output_format, OutputFormat::Yaml);
        assert!(config.jobs[0].shape.is_array());
    }

    #[test]
    fn test_defaults_applied() {
        let config = SentinelConfig::parse(
            r#"
api:
  provider: Anthropic
  model: m
jobs:
  - name: a
    instruction: do it
    file_path: a.json
    schema: { type: array, items: { title: string } }
"#,
            false,
        )
        .unwrap();

        assert_eq!(config.api.delay_between_jobs, 60);
        assert_eq!(config.api.max_retries, 3);
        assert_eq!(config.api.retry_base_secs, 30);
        assert_eq!(config.api.max_tokens, 4096);
        assert_eq!(config.api.max_web_searches, 5);
        assert!(!config.api.fail_fast);
        assert_eq!(config.jobs[0].output_format, OutputFormat::Json);
        assert_eq!(config.provider().unwrap(), ProviderKind::Anthropic);
    }

    #[test]
    fn test_runner_config_mapping() {
        let mut config = sample();
        config.api.fail_fast = true;
        config.api.delay_between_jobs = 5;

        let runner = config.runner_config();
        assert_eq!(runner.failure_policy, FailurePolicy::Abort);
        assert_eq!(runner.delay_between_jobs(), Duration::from_secs(5));
        assert_eq!(runner.backoff_delay(1), Duration::from_secs(60));
    }

    #[test]
    fn test_toml_config() {
        let config = SentinelConfig::parse(
            r#"
[api]
provider = "anthropic"
model = "m"
fail_fast = true

[[jobs]]
name = "a"
instruction = "do it"
file_path = "a.yaml"
output_format = "yaml"

[jobs.schema]
type = "array"

[jobs.schema.items]
title = "string"
date = "date"
"#,
            true,
        )
        .unwrap();

        config.validate().unwrap();
        assert!(config.api.fail_fast);
        assert_eq!(config.jobs[0].output_format, OutputFormat::Yaml);
        let date = config.jobs[0].shape.fields().find(|(name, _)| *name == "date");
        assert!(date.is_some_and(|(_, tag)| tag.is_date()));
    }

    #[test]
    fn test_unsupported_provider() {
        let mut config = sample();
        config.api.provider = "openai".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Unsupported provider 'openai'"));
    }

    #[test]
    fn test_empty_model_rejected() {
        let mut config = sample();
        config.api.model = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_no_jobs_rejected() {
        let mut config = sample();
        config.jobs.clear();
        assert!(config.validate().unwrap_err().to_string().contains("No jobs"));
    }

    #[test]
    fn test_duplicate_job_names_rejected() {
        let mut config = sample();
        config.jobs[1].name = config.jobs[0].name.clone();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Duplicate job name 'recent-news'"));
    }

    #[test]
    fn test_zero_retries_rejected() {
        let mut config = sample();
        config.api.max_retries = 0;
        assert!(config.validate().unwrap_err().to_string().contains("max_retries"));
    }

    #[test]
    fn test_empty_instruction_rejected() {
        let mut config = sample();
        config.jobs[0].instruction = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_select_jobs() {
        let config = sample();

        assert_eq!(config.select_jobs(&[]).unwrap().len(), 2);

        let picked = config.select_jobs(&["conference-talks".to_string()]).unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].name, "conference-talks");

        assert!(config.select_jobs(&["nope".to_string()]).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = SentinelConfig::load(Path::new("/nonexistent/sentinel.yaml")).unwrap_err();
        assert!(err.to_string().contains("sentinel init"));
    }

    #[test]
    fn test_credentials() {
        assert!(ApiCredentials::new(None).is_err());
        assert!(ApiCredentials::new(Some("  ".into())).is_err());

        let creds = ApiCredentials::new(Some("sk-test".into())).unwrap();
        assert_eq!(creds.api_key(), "sk-test");
        assert!(!format!("{:?}", creds).contains("sk-test"));
    }
}
