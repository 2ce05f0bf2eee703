//! Sentinel Extractor
//!
//! Runs research jobs: asks a web-search-capable model for new items, pulls a
//! structured array out of the reply, validates it against the job's shape
//! and merges it into the job's record file.
//!
//! # Architecture
//!
//! ```text
//! Job → PromptBuilder → SearchProvider → TextExtractor → validate → merge → RecordStore
//! ```
//!
//! # Key Features
//!
//! - **Deduplication Context**: Existing records go into both prompts
//! - **Lenient Extraction**: Code fences, surrounding prose and bare YAML are tolerated
//! - **Rate-Limit Backoff**: Exponential waits, owned by the runner
//! - **No-op Persistence**: Files are rewritten only when something was added
//! - **Batches**: Sequential jobs with a pause in between and a failure policy
//!
//! # Example Usage
//!
//! ```no_run
//! use sentinel_domain::{Job, OutputFormat, Shape};
//! use sentinel_extractor::{JobRunner, RunnerConfig};
//! use sentinel_llm::MockProvider;
//! use sentinel_store::FileStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = MockProvider::new(r#"[{"title": "X", "url": "http://x"}]"#);
//! let runner = JobRunner::new(provider, FileStore::new(), RunnerConfig::default());
//!
//! let job = Job {
//!     name: "news".to_string(),
//!     instruction: "Find recent news about the lab.".to_string(),
//!     file_path: "data/news.json".into(),
//!     shape: Shape::array([("title", "string"), ("url", "string")]),
//!     output_format: OutputFormat::Json,
//! };
//!
//! let outcome = runner.run_job(&job).await?;
//! println!("{} new items, {} added", outcome.records.len(), outcome.added);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod batch;
mod config;
mod error;
mod pacing;
mod parser;
mod prompt;
mod runner;
mod types;


pub use config::{FailurePolicy, RunnerConfig};
pub use error::ExtractorError;
pub use pacing::{Sleeper, TokioSleeper};
pub use parser::{
    extract_structured, BracketSpan, DirectParse, ExtractionStrategy, FencedBlock, TextExtractor,
    YamlDocument,
};
pub use prompt::{PromptBuilder, Prompts};
pub use runner::JobRunner;
pub use types::{BatchEntry, BatchReport, JobOutcome};
