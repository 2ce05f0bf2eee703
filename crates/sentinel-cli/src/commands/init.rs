//! Init command implementation.

use crate::cli::InitArgs;
use crate::config::{SentinelConfig, SAMPLE_CONFIG};
use crate::error::Result;
use crate::output::Formatter;
use sentinel_domain::traits::RecordStore;
use sentinel_store::FileStore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// What `init` did.
#[derive(Debug, Default)]
pub struct InitSummary {
    /// Whether the sample config was written
    pub config_written: bool,
    /// Record files created empty
    pub created: Vec<PathBuf>,
}

/// Execute the init command.
pub fn execute_init(args: InitArgs, config_path: &Path, formatter: &Formatter) -> Result<()> {
    let summary = init_workspace(config_path, args.force)?;

    if summary.config_written {
        println!("{}", formatter.success(&format!("Wrote {}", config_path.display())));
    } else {
        println!(
            "{}",
            formatter.info(&format!(
                "{} already exists (use --force to overwrite)",
                config_path.display()
            ))
        );
    }

    for path in &summary.created {
        println!("{}", formatter.success(&format!("Created {}", path.display())));
    }

    Ok(())
}

/// Write the sample config if needed, then create every missing record file.
pub fn init_workspace(config_path: &Path, force: bool) -> Result<InitSummary> {
    let config_written = write_sample_config(config_path, force)?;

    let config = SentinelConfig::load(config_path)?;
    config.validate()?;

    Ok(InitSummary {
        config_written,
        created: create_record_files(&config)?,
    })
}

/// Write the sample config unless one exists. Returns whether it was written.
pub fn write_sample_config(config_path: &Path, force: bool) -> Result<bool> {
    if config_path.exists() && !force {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(config_path, SAMPLE_CONFIG)?;
    info!("Wrote sample config to {}", config_path.display());
    Ok(true)
}

/// Create an empty record file for every job whose file is missing.
pub fn create_record_files(config: &SentinelConfig) -> Result<Vec<PathBuf>> {
    let store = FileStore::new();
    let mut created = Vec::new();

    for job in &config.jobs {
        if job.file_path.exists() {
            continue;
        }
        store.save(&job.file_path, job.output_format, &[])?;
        info!("[{}] Created {}", job.name, job.file_path.display());
        created.push(job.file_path.clone());
    }

    Ok(created)
}
