//! Check command implementation.

use crate::config::{SentinelConfig, API_KEY_ENV};
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;

/// Execute the check command.
pub fn execute_check(config_path: &Path, formatter: &Formatter) -> Result<()> {
    let config = SentinelConfig::load(config_path)?;
    config.validate()?;

    println!("{}", formatter.format_jobs(&config.jobs)?);
    println!(
        "{}",
        formatter.success(&format!(
            "{} is valid: {} job(s), provider {}, model {}",
            config_path.display(),
            config.jobs.len(),
            config.provider()?,
            config.api.model
        ))
    );

    if std::env::var(API_KEY_ENV).map_or(true, |key| key.trim().is_empty()) {
        println!(
            "{}",
            formatter.warning(&format!("{} is not set; 'run' will need --api-key", API_KEY_ENV))
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SAMPLE_CONFIG;
    use crate::output::SummaryFormat;
    use tempfile::TempDir;

    #[test]
    fn test_check_sample_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sentinel.config.yaml");
        std::fs::write(&path, SAMPLE_CONFIG).unwrap();

        let formatter = Formatter::new(SummaryFormat::Quiet, false);
        assert!(execute_check(&path, &formatter).is_ok());
    }

    #[test]
    fn test_check_rejects_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sentinel.config.yaml");
        std::fs::write(&path, "api:\n  provider: other\n  model: m\njobs: []\n").unwrap();

        let formatter = Formatter::new(SummaryFormat::Quiet, false);
        let err = execute_check(&path, &formatter).unwrap_err();
        assert!(err.to_string().contains("Unsupported provider"));
    }
}
