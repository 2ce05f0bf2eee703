//! Output formatting for the CLI.

use crate::error::Result;
use colored::*;
use sentinel_domain::Job;
use sentinel_extractor::{BatchEntry, BatchReport};
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Summary format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// One `name<TAB>count` line per job
    Quiet,
}

/// Output formatter.
pub struct Formatter {
    format: SummaryFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: SummaryFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The summary format.
    pub fn format(&self) -> SummaryFormat {
        self.format
    }

    /// Format the per-job report line.
    pub fn job_line(&self, entry: &BatchEntry) -> String {
        match &entry.result {
            Ok(outcome) => self.colorize(
                &format!(
                    "[{}] completed. New items: {} ({} added to store)",
                    outcome.job,
                    outcome.records.len(),
                    outcome.added
                ),
                "green",
            ),
            Err(e) => self.colorize(&format!("[{}] failed: {}", entry.job, e), "red"),
        }
    }

    /// Format a batch summary.
    pub fn format_summary(&self, report: &BatchReport) -> Result<String> {
        match self.format {
            SummaryFormat::Json => self.format_summary_json(report),
            SummaryFormat::Table => Ok(self.format_summary_table(report)),
            SummaryFormat::Quiet => Ok(self.format_summary_quiet(report)),
        }
    }

    fn format_summary_json(&self, report: &BatchReport) -> Result<String> {
        let jobs: Vec<serde_json::Value> = report
            .entries
            .iter()
            .map(|entry| match &entry.result {
                Ok(outcome) => json!({
                    "job": outcome.job,
                    "status": "completed",
                    "new_items": outcome.records.len(),
                    "added": outcome.added,
                    "persisted": outcome.persisted,
                }),
                Err(e) => json!({
                    "job": entry.job,
                    "status": "failed",
                    "error": e.to_string(),
                }),
            })
            .collect();

        let summary = json!({
            "jobs": jobs,
            "skipped": report.skipped,
        });

        Ok(serde_json::to_string_pretty(&summary)?)
    }

    fn format_summary_table(&self, report: &BatchReport) -> String {
        if report.entries.is_empty() && report.skipped.is_empty() {
            return self.colorize("No jobs ran.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Job", "Status", "New items", "Added", "Detail"]);

        for entry in &report.entries {
            match &entry.result {
                Ok(outcome) => {
                    let detail = if outcome.persisted { "saved" } else { "unchanged" };
                    builder.push_record([
                        outcome.job.clone(),
                        "completed".to_string(),
                        outcome.records.len().to_string(),
                        outcome.added.to_string(),
                        detail.to_string(),
                    ]);
                }
                Err(e) => {
                    builder.push_record([
                        entry.job.clone(),
                        "failed".to_string(),
                        "-".to_string(),
                        "-".to_string(),
                        e.to_string(),
                    ]);
                }
            }
        }

        for name in &report.skipped {
            builder.push_record([
                name.clone(),
                "skipped".to_string(),
                "-".to_string(),
                "-".to_string(),
                String::new(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn format_summary_quiet(&self, report: &BatchReport) -> String {
        report
            .entries
            .iter()
            .map(|entry| match &entry.result {
                Ok(outcome) => format!("{}\t{}", outcome.job, outcome.records.len()),
                Err(_) => format!("{}\tfailed", entry.job),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format the job list printed by `check`.
    pub fn format_jobs(&self, jobs: &[Job]) -> Result<String> {
        match self.format {
            SummaryFormat::Json => {
                let list: Vec<serde_json::Value> = jobs
                    .iter()
                    .map(|job| {
                        json!({
                            "name": job.name,
                            "file_path": job.file_path.display().to_string(),
                            "output_format": job.output_format.as_str(),
                            "fields": job.shape.fields().map(|(name, _)| name).collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&list)?)
            }
            SummaryFormat::Quiet => Ok(jobs.iter().map(|j| j.name.as_str()).collect::<Vec<_>>().join("\n")),
            SummaryFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Job", "File", "Format", "Fields"]);
                for job in jobs {
                    let fields: Vec<&str> = job.shape.fields().map(|(name, _)| name).collect();
                    builder.push_record([
                        job.name.clone(),
                        job.file_path.display().to_string(),
                        job.output_format.to_string(),
                        fields.join(", "),
                    ]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
