#![forbid(unsafe_code)]

mod cli;
mod commands;
mod constants;
mod editor;
mod registry;
mod storage;
mod validation;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level as TraceLevel;
use tracing_subscriber::FmtSubscriber;

use cli::Cli;

fn init_tracing() -> Result<()> {
    // Diagnostics stay quiet unless asked for; command output owns stdout
    let log_level = match std::env::var(constants::env::LOG_LEVEL)
        .unwrap_or_else(|_| "warn".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "info" => TraceLevel::INFO,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("failed to install tracing subscriber")
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;
    commands::dispatch(cli)
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
