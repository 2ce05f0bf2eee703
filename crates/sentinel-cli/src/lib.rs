//! Sentinel CLI library.
//!
//! This library provides the core functionality for the `sentinel` command-line
//! interface, including configuration loading, command execution, and output
//! formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::{ApiCredentials, SentinelConfig};
pub use error::{CliError, Result};
pub use output::{Formatter, SummaryFormat};
