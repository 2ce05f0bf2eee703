//! Job module - one configured unit of research work

use crate::Shape;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Serialization format of a job's record file and of the model's reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON array of objects
    #[default]
    Json,

    /// YAML sequence of mappings
    Yaml,
}

impl OutputFormat {
    /// Get the format name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }

    /// Human-facing name used in prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            OutputFormat::Json => "JSON",
            OutputFormat::Yaml => "YAML",
        }
    }

    /// Parse a format from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "yaml" | "yml" => Some(OutputFormat::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid output format: {}", s))
    }
}

/// A configured job
///
/// Jobs are built once from configuration and never mutated while running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job name, used in reports and logs
    pub name: String,

    /// Natural-language research instruction for the model
    pub instruction: String,

    /// Record file this job reads and rewrites
    pub file_path: PathBuf,

    /// Expected record shape
    #[serde(rename = "schema")]
    pub shape: Shape,

    /// Format of the record file and of the requested reply
    #[serde(default)]
    pub output_format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("yml"), Some(OutputFormat::Yaml));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_job_deserializes_with_default_format() {
        let yaml = r#"
name: academic-awards
instruction: Find recent awards
file_path: content/awards.json
schema:
  type: array
  items:
    title: string
    date: YYYY-MM-DD
"#;
        let job: Job = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(job.name, "academic-awards");
        assert_eq!(job.output_format, OutputFormat::Json);
        assert_eq!(job.file_path, PathBuf::from("content/awards.json"));
        assert_eq!(job.shape.items.len(), 2);
    }

    #[test]
    fn test_job_yaml_format() {
        let yaml = r#"
name: news
instruction: Find news
file_path: news.yaml
output_format: yaml
schema: { type: array, items: { title: string } }
"#;
        let job: Job = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(job.output_format, OutputFormat::Yaml);
    }
}
