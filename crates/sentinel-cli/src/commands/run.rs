//! Run command implementation.

use crate::cli::RunArgs;
use crate::config::{ApiCredentials, ProviderKind, SentinelConfig};
use crate::error::{CliError, Result};
use crate::output::{Formatter, SummaryFormat};
use sentinel_domain::traits::{RecordStore, SearchProvider};
use sentinel_domain::Job;
use sentinel_extractor::{BatchReport, FailurePolicy, JobRunner, Sleeper};
use sentinel_llm::AnthropicProvider;
use sentinel_store::FileStore;
use std::path::Path;
use tracing::info;

/// Execute the run command.
pub async fn execute_run(args: RunArgs, config_path: &Path, formatter: &Formatter) -> Result<()> {
    let config = SentinelConfig::load(config_path)?;
    config.validate()?;

    let jobs = config.select_jobs(&args.jobs)?;
    let credentials = ApiCredentials::new(args.api_key)?;

    let mut runner_config = config.runner_config();
    if args.fail_fast {
        runner_config = runner_config.with_failure_policy(FailurePolicy::Abort);
    }

    info!(
        "Running {} job(s) with {} model {}",
        jobs.len(),
        config.provider()?,
        config.api.model
    );

    let (report, rendered) = match config.provider()? {
        ProviderKind::Anthropic => {
            let provider = AnthropicProvider::new(config.anthropic_config(&credentials))?;
            let runner = JobRunner::new(provider, FileStore::new(), runner_config);
            run_jobs(&runner, &jobs, formatter).await?
        }
    };

    println!("{}", rendered);
    check_report(&report, jobs.len())
}

/// Run `jobs` on an already configured runner and render the report.
pub async fn run_jobs<P, S, Z>(
    runner: &JobRunner<P, S, Z>,
    jobs: &[Job],
    formatter: &Formatter,
) -> Result<(BatchReport, String)>
where
    P: SearchProvider,
    S: RecordStore,
    Z: Sleeper,
{
    let report = runner.run_batch(jobs).await;
    let rendered = render_report(&report, formatter)?;
    Ok((report, rendered))
}

/// Per-job lines followed by the summary.
///
/// JSON and quiet output carry the summary only.
pub fn render_report(report: &BatchReport, formatter: &Formatter) -> Result<String> {
    let summary = formatter.format_summary(report)?;
    if formatter.format() != SummaryFormat::Table {
        return Ok(summary);
    }

    let mut lines: Vec<String> = report.entries.iter().map(|e| formatter.job_line(e)).collect();
    if report.aborted() {
        lines.push(formatter.warning(&format!(
            "Stopped after first failure; skipped: {}",
            report.skipped.join(", ")
        )));
    }
    lines.push(String::new());
    lines.push(summary);
    Ok(lines.join("\n"))
}

/// Turn a report with failures into an error for the exit code.
pub fn check_report(report: &BatchReport, total: usize) -> Result<()> {
    let failed = report.failed().count();
    if failed > 0 {
        return Err(CliError::JobsFailed { failed, total });
    }
    Ok(())
}
