// SPDX-FileCopyrightText: 2026 Strongroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strongroom - a personal credential vault client.
//!
//! This is the binary entry point for the Strongroom shell.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod shell;

/// Strongroom - a personal credential vault client.
#[derive(Parser, Debug)]
#[command(name = "strongroom", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch the interactive vault shell.
    Shell,
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match strongroom_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            for error in &errors {
                eprintln!("config error: {error}");
            }
            std::process::exit(1);
        }
    };

    // Logs go to stderr so the shell prompt on stdout stays clean.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.app.log_level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Config) => {
            println!("api.base_url = {}", config.api.base_url);
            println!("api.request_timeout_secs = {}", config.api.request_timeout_secs);
            println!("app.log_level = {}", config.app.log_level);
        }
        Some(Commands::Shell) | None => {
            if let Err(e) = shell::run_shell(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
    }
}
