//! Sentinel CLI - Keep content files current with web-search research jobs.

use clap::Parser;
use colored::control;
use sentinel_cli::commands;
use sentinel_cli::{Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A project .env may carry the API key; real environment variables win.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if cli.no_color {
        control::set_override(false);
    }

    let formatter = Formatter::new(cli.format.into(), !cli.no_color);

    if let Err(e) = run(cli, &formatter).await {
        eprintln!("{}", formatter.error(&e.to_string()));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, formatter: &Formatter) -> sentinel_cli::Result<()> {
    match cli.command {
        Command::Run(args) => commands::execute_run(args, &cli.config, formatter).await,
        Command::Init(args) => commands::execute_init(args, &cli.config, formatter),
        Command::Check => commands::execute_check(&cli.config, formatter),
    }
}
