//! Error types for the Extractor

use thiserror::Error;

/// Errors that can end a job
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Search provider failed with a non-retryable error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Still rate limited after exhausting every attempt
    #[error("Rate limited after {attempts} attempt(s)")]
    RateLimited {
        /// Attempts made, including the first
        attempts: u32,
    },

    /// No extraction strategy recovered a structured value from the reply
    #[error("Could not extract structured data: {0}")]
    Extraction(String),

    /// The structured value does not conform to the job's shape
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Writing the record file failed
    #[error("Store error: {0}")]
    Store(String),

    /// Prompt context could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for ExtractorError {
    fn from(e: serde_yaml::Error) -> Self {
        ExtractorError::Serialization(e.to_string())
    }
}

/// Encoding failures are `Serialization`; filesystem failures are `Store`
impl From<sentinel_store::StoreError> for ExtractorError {
    fn from(e: sentinel_store::StoreError) -> Self {
        use sentinel_store::StoreError;

        match e {
            StoreError::Json(_) | StoreError::Yaml(_) => ExtractorError::Serialization(e.to_string()),
            StoreError::Io(_) | StoreError::Persist { .. } => ExtractorError::Store(e.to_string()),
        }
    }
}
