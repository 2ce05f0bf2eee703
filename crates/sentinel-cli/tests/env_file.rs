//! API key resolution through a project `.env` file.
//!
//! Lives in its own test binary because loading a `.env` file mutates the
//! process environment.

use clap::Parser;
use sentinel_cli::config::API_KEY_ENV;
use sentinel_cli::{ApiCredentials, Cli, Command};
use std::env;
use std::fs;
use tempfile::TempDir;

fn run_api_key(args: &[&str]) -> Option<String> {
    let cli = Cli::try_parse_from(args).unwrap();
    match cli.command {
        Command::Run(args) => args.api_key,
        _ => panic!("Expected Run command"),
    }
}

#[test]
fn test_api_key_from_env_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".env");
    fs::write(&path, format!("# project secrets\n{}=sk-from-dotenv\nOTHER=1\n", API_KEY_ENV)).unwrap();

    env::remove_var(API_KEY_ENV);
    dotenvy::from_path(&path).unwrap();

    let creds = ApiCredentials::new(run_api_key(&["sentinel", "run"])).unwrap();
    assert_eq!(creds.api_key(), "sk-from-dotenv");

    let flag = ApiCredentials::new(run_api_key(&["sentinel", "run", "--api-key", "sk-flag"])).unwrap();
    assert_eq!(flag.api_key(), "sk-flag");
}
