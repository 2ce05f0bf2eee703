//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and the outside
//! world. Implementations live in other crates.

use crate::{OutputFormat, Record, RecordSet};
use std::future::Future;
use std::path::Path;

/// Trait for the web-search-capable model
///
/// Implemented by the infrastructure layer (sentinel-llm)
pub trait SearchProvider {
    /// Error type for search operations
    type Error: std::fmt::Display;

    /// Run one research request and return the concatenated reply text
    fn search(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Whether an error is a transient rate-limit signal worth retrying
    fn is_rate_limited(error: &Self::Error) -> bool;
}

/// Trait for reading and writing a job's record file
///
/// Implemented by the infrastructure layer (sentinel-store)
pub trait RecordStore {
    /// Error type for write operations
    type Error: std::fmt::Display;

    /// Load the records at `path`
    ///
    /// A missing or unreadable file yields an empty set; loading never fails.
    fn load(&self, path: &Path, format: OutputFormat) -> RecordSet;

    /// Replace the contents of `path` with `records`
    fn save(&self, path: &Path, format: OutputFormat, records: &[Record]) -> Result<(), Self::Error>;
}
