//! CLI command definitions and argument parsing.

use crate::config::{API_KEY_ENV, DEFAULT_CONFIG_PATH};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Sentinel - Keep content files current with web-search research jobs.
#[derive(Debug, Parser)]
#[command(name = "sentinel")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Summary format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (one line per job)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run configured jobs
    Run(RunArgs),

    /// Write a sample config and create missing record files
    Init(InitArgs),

    /// Validate the config without calling the model
    Check,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Only run the named job (repeatable)
    #[arg(short, long = "job", value_name = "NAME")]
    pub jobs: Vec<String>,

    /// Stop at the first failed job
    #[arg(long)]
    pub fail_fast: bool,

    /// API key for the search provider
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,
}

/// Arguments for the init command.
#[derive(Debug, Parser)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

impl Cli {
    /// Log filter directive for the verbosity flags.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "sentinel=info,sentinel_cli=info,sentinel_extractor=info,sentinel_llm=info,sentinel_store=info,warn",
            1 => "sentinel=debug,sentinel_cli=debug,sentinel_extractor=debug,sentinel_llm=debug,sentinel_store=debug,sentinel_gatekeeper=debug,info",
            _ => "trace",
        }
    }
}

impl From<CliFormat> for crate::output::SummaryFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::output::SummaryFormat::Table,
            CliFormat::Json => crate::output::SummaryFormat::Json,
            CliFormat::Quiet => crate::output::SummaryFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command_defaults() {
        let cli = Cli::try_parse_from(["sentinel", "run"]).unwrap();
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(cli.format, CliFormat::Table);
        match cli.command {
            Command::Run(args) => {
                assert!(args.jobs.is_empty());
                assert!(!args.fail_fast);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_run_selected_jobs() {
        let cli = Cli::try_parse_from([
            "sentinel",
            "run",
            "--job",
            "news",
            "-j",
            "talks",
            "--fail-fast",
            "--api-key",
            "sk-test",
        ])
        .unwrap();
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.jobs, vec!["news", "talks"]);
                assert!(args.fail_fast);
                assert_eq!(args.api_key.as_deref(), Some("sk-test"));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sentinel", "check", "--config", "other.toml", "-f", "json", "-vv"]).unwrap();
        assert!(matches!(cli.command, Command::Check));
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert_eq!(cli.format, CliFormat::Json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_filter(), "trace");
    }

    #[test]
    fn test_init_force() {
        let cli = Cli::try_parse_from(["sentinel", "init", "--force"]).unwrap();
        assert!(matches!(cli.command, Command::Init(InitArgs { force: true })));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["sentinel", "-q", "-v", "check"]).is_err());
        let cli = Cli::try_parse_from(["sentinel", "-q", "check"]).unwrap();
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["sentinel"]).is_err());
    }
}
