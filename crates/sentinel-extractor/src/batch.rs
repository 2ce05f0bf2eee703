//! Sequential batch execution

use crate::config::FailurePolicy;
use crate::pacing::Sleeper;
use crate::runner::JobRunner;
use crate::types::{BatchEntry, BatchReport};
use sentinel_domain::traits::{RecordStore, SearchProvider};
use sentinel_domain::Job;
use tracing::{error, info};

impl<P, S, Z> JobRunner<P, S, Z>
where
    P: SearchProvider,
    S: RecordStore,
    Z: Sleeper,
{
    /// Run jobs in order, pausing between consecutive jobs
    ///
    /// Failures are isolated per job unless the failure policy is
    /// [`FailurePolicy::Abort`], in which case the remaining jobs are listed
    /// as skipped. No pause follows the last job that runs.
    pub async fn run_batch(&self, jobs: &[Job]) -> BatchReport {
        let mut report = BatchReport::default();
        let delay = self.config().delay_between_jobs();

        for (index, job) in jobs.iter().enumerate() {
            let result = self.run_job(job).await;

            let stop = match &result {
                Ok(outcome) => {
                    info!(
                        "[{}] completed. New items: {} ({} added to store)",
                        job.name,
                        outcome.records.len(),
                        outcome.added
                    );
                    false
                }
                Err(e) => {
                    error!("[{}] failed: {}", job.name, e);
                    self.config().failure_policy == FailurePolicy::Abort
                }
            };

            report.entries.push(BatchEntry {
                job: job.name.clone(),
                result,
            });

            let remaining = &jobs[index + 1..];
            if stop {
                if !remaining.is_empty() {
                    info!("Aborting batch, skipping {} job(s)", remaining.len());
                }
                report.skipped = remaining.iter().map(|j| j.name.clone()).collect();
                break;
            }

            if !remaining.is_empty() && !delay.is_zero() {
                info!("Waiting {}s before next job", delay.as_secs());
                self.sleeper().sleep(delay).await;
            }
        }

        report
    }
}
