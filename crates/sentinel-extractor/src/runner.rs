//! Core Job Runner implementation

use crate::config::RunnerConfig;
use crate::error::ExtractorError;
use crate::pacing::{Sleeper, TokioSleeper};
use crate::parser::TextExtractor;
use crate::prompt::{PromptBuilder, Prompts};
use crate::types::JobOutcome;
use sentinel_domain::traits::{RecordStore, SearchProvider};
use sentinel_domain::Job;
use sentinel_gatekeeper::{into_records, merge, validate};
use tracing::{debug, info, warn};

/// Runs research jobs end to end
///
/// One run is: load existing records, build prompts, call the search
/// provider (backing off while rate limited), extract, validate, merge and
/// persist if anything changed.
pub struct JobRunner<P, S, Z = TokioSleeper> {
    provider: P,
    store: S,
    sleeper: Z,
    extractor: TextExtractor,
    config: RunnerConfig,
}

impl<P, S> JobRunner<P, S, TokioSleeper>
where
    P: SearchProvider,
    S: RecordStore,
{
    /// Create a new JobRunner that sleeps on the tokio timer
    pub fn new(provider: P, store: S, config: RunnerConfig) -> Self {
        Self {
            provider,
            store,
            sleeper: TokioSleeper,
            extractor: TextExtractor::default(),
            config,
        }
    }
}

impl<P, S, Z> JobRunner<P, S, Z>
where
    P: SearchProvider,
    S: RecordStore,
    Z: Sleeper,
{
    /// Replace the sleeper used for backoff and inter-job pauses
    pub fn with_sleeper<Z2: Sleeper>(self, sleeper: Z2) -> JobRunner<P, S, Z2> {
        JobRunner {
            provider: self.provider,
            store: self.store,
            sleeper,
            extractor: self.extractor,
            config: self.config,
        }
    }

    /// Replace the extraction strategy chain
    pub fn with_extractor(mut self, extractor: TextExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Runner configuration
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// The search provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The record store
    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn sleeper(&self) -> &Z {
        &self.sleeper
    }

    /// Run one job
    ///
    /// Returns the validated records from this run's reply (not the whole
    /// accumulated store). The record file is written only when the merge
    /// adds something.
    pub async fn run_job(&self, job: &Job) -> Result<JobOutcome, ExtractorError> {
        info!("[{}] Starting job ({})", job.name, job.file_path.display());

        let existing = self.store.load(&job.file_path, job.output_format);
        debug!("[{}] {} existing records", job.name, existing.len());

        let prompts = PromptBuilder::new(job)
            .with_existing_records(&existing)
            .build()?;
        debug!(
            "[{}] Prompt lengths: system {} chars, user {} chars",
            job.name,
            prompts.system.len(),
            prompts.user.len()
        );

        let reply = self.search_with_backoff(&job.name, &prompts).await?;
        debug!("[{}] Reply length: {} chars", job.name, reply.len());

        let mut value = self.extractor.extract(&reply, job.output_format)?;

        let validation = validate(&mut value, &job.shape);
        if !validation.is_accepted() {
            let message = validation.message();
            warn!("[{}] Reply rejected: {}", job.name, message);
            return Err(ExtractorError::Validation(message));
        }

        let incoming = into_records(value)
            .ok_or_else(|| ExtractorError::Validation("expected a list of objects".to_string()))?;

        let merged = merge(&existing, &incoming);

        if merged.changed {
            self.store
                .save(&job.file_path, job.output_format, &merged.records)
                .map_err(|e| ExtractorError::Store(e.to_string()))?;
            info!(
                "[{}] Saved {} records to {} ({} new)",
                job.name,
                merged.records.len(),
                job.file_path.display(),
                merged.added
            );
        } else {
            debug!("[{}] Nothing new, leaving {} untouched", job.name, job.file_path.display());
        }

        info!(
            "[{}] Completed: {} items returned, {} added",
            job.name,
            incoming.len(),
            merged.added
        );

        Ok(JobOutcome {
            job: job.name.clone(),
            records: incoming,
            added: merged.added,
            persisted: merged.changed,
        })
    }

    /// Call the provider, backing off exponentially while rate limited
    ///
    /// Attempt `n` (zero-based) that is rate limited waits
    /// `retry_base * 2^n` before the next attempt; once `max_retries`
    /// attempts have been rate limited the job fails.
    async fn search_with_backoff(&self, job_name: &str, prompts: &Prompts) -> Result<String, ExtractorError> {
        let max_attempts = self.config.max_retries.max(1);
        let mut attempt: u32 = 0;

        loop {
            match self.provider.search(&prompts.system, &prompts.user).await {
                Ok(reply) => return Ok(reply),
                Err(e) if P::is_rate_limited(&e) => {
                    if attempt + 1 >= max_attempts {
                        warn!(
                            "[{}] Still rate limited after {} attempt(s), giving up",
                            job_name, max_attempts
                        );
                        return Err(ExtractorError::RateLimited {
                            attempts: attempt + 1,
                        });
                    }

                    let wait = self.config.backoff_delay(attempt);
                    warn!(
                        "[{}] Rate limited (attempt {}/{}), retrying in {}s",
                        job_name,
                        attempt + 1,
                        max_attempts,
                        wait.as_secs()
                    );
                    self.sleeper.sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => return Err(ExtractorError::Llm(e.to_string())),
            }
        }
    }
}
