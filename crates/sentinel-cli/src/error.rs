//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Record file error
    #[error("Store error: {0}")]
    Store(#[from] sentinel_store::StoreError),

    /// Runner settings rejected
    #[error("{0}")]
    Extractor(#[from] sentinel_extractor::ExtractorError),

    /// Search provider could not be built
    #[error("Provider error: {0}")]
    Provider(#[from] sentinel_llm::LlmError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// One or more jobs failed; details were already reported
    #[error("{failed} of {total} job(s) failed")]
    JobsFailed {
        /// Number of failed jobs
        failed: usize,
        /// Number of selected jobs
        total: usize,
    },
}
