//! Result types for job and batch runs

use crate::error::ExtractorError;
use sentinel_domain::RecordSet;
use serde::Serialize;

/// What one successful job run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobOutcome {
    /// Job name
    pub job: String,

    /// Validated records from this run's reply, before merging
    pub records: RecordSet,

    /// Distinct records the merge added to the store
    pub added: usize,

    /// Whether the record file was rewritten
    pub persisted: bool,
}

/// One job's entry in a batch report
#[derive(Debug)]
pub struct BatchEntry {
    /// Job name
    pub job: String,

    /// Outcome or the error that ended the job
    pub result: Result<JobOutcome, ExtractorError>,
}

/// Summary of a batch run, in execution order
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Jobs that ran
    pub entries: Vec<BatchEntry>,

    /// Jobs never started because the batch aborted
    pub skipped: Vec<String>,
}

impl BatchReport {
    /// Successful outcomes
    pub fn succeeded(&self) -> impl Iterator<Item = &JobOutcome> {
        self.entries.iter().filter_map(|e| e.result.as_ref().ok())
    }

    /// Failed jobs with their errors
    pub fn failed(&self) -> impl Iterator<Item = (&str, &ExtractorError)> {
        self.entries
            .iter()
            .filter_map(|e| e.result.as_ref().err().map(|err| (e.job.as_str(), err)))
    }

    /// Whether any job failed
    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(|e| e.result.is_err())
    }

    /// Whether the batch stopped early
    pub fn aborted(&self) -> bool {
        !self.skipped.is_empty()
    }
}
