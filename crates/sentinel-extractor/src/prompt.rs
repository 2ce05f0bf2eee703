//! Prompt engineering for research jobs

use crate::error::ExtractorError;
use sentinel_domain::{Job, OutputFormat, Record, Shape};
use sentinel_store::FileStore;

/// System and user prompt for one search call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    /// Output contract, shape and existing content
    pub system: String,
    /// The job's instruction plus existing content
    pub user: String,
}

/// Builds prompts for a job
pub struct PromptBuilder<'a> {
    job: &'a Job,
    existing: &'a [Record],
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(job: &'a Job) -> Self {
        Self { job, existing: &[] }
    }

    /// Add the records already on disk so the model can skip them
    pub fn with_existing_records(mut self, records: &'a [Record]) -> Self {
        self.existing = records;
        self
    }

    /// Build the system and user prompts
    ///
    /// The shape and existing records are rendered in the job's output
    /// format so the model sees exactly what it is expected to produce.
    pub fn build(&self) -> Result<Prompts, ExtractorError> {
        let format = self.job.output_format;
        let shape = render_shape(&self.job.shape, format)?;
        let existing = self.render_existing(format)?;
        let name = format.display_name();

        let mut system = String::new();

        // 1. Role and output contract
        system.push_str(ROLE);
        system.push_str("\n\n");
        system.push_str(&OUTPUT_RULES.replace("{format}", name));
        system.push_str("\n\n");

        // 2. Shape
        system.push_str(&format!("Schema:\n{}\n\n", shape.trim_end()));

        // 3. Deduplication context
        system.push_str("Existing content (do not return any of these items again):\n");
        system.push_str(existing.trim_end());
        system.push('\n');

        let mut user = String::new();
        user.push_str(self.job.instruction.trim());
        user.push_str("\n\n");
        user.push_str("Existing content:\n");
        user.push_str(existing.trim_end());
        user.push_str("\n\n");
        user.push_str(&format!(
            "Respond with only a {} array of new items, or [] if there are none.",
            name
        ));

        Ok(Prompts { system, user })
    }

    fn render_existing(&self, format: OutputFormat) -> Result<String, ExtractorError> {
        if self.existing.is_empty() {
            return Ok("[]".to_string());
        }
        Ok(FileStore::encode(self.existing, format)?)
    }
}

fn render_shape(shape: &Shape, format: OutputFormat) -> Result<String, ExtractorError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(shape)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(shape)?),
    }
}

const ROLE: &str = "You are a research assistant with web search. Use it to find current, \
verifiable information for the task you are given.";

const OUTPUT_RULES: &str = r#"Output rules:
- Respond with ONLY valid {format}. No prose, no explanations, no markdown code blocks.
- The response must be a {format} array of objects that matches the schema below.
- Every object must contain every field named in the schema.
- Fields typed "YYYY-MM-DD" or "date" are calendar dates written as YYYY-MM-DD.
- Every other field is text; a literal such as "example.png" shows the expected form of the value.
- Only return items that are not already listed under existing content."#;
