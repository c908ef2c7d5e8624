// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Postcraft - a chat assistant that drafts, illustrates, narrates, and
//! publishes page posts.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use postcraft_config::{ConfigError, PostcraftConfig};

/// Postcraft - drafts, illustrates, narrates, and publishes page posts.
#[derive(Parser, Debug)]
#[command(name = "postcraft", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long = "config", global = true, value_name = "FILE")]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway (webhook, publishing, web API).
    Serve,
    /// Chat with the assistant locally and manage the schedule list.
    Shell,
    /// Inspect postcraft configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate configuration and report missing secrets.
    Check,
}

fn load_config(path: Option<&PathBuf>) -> Result<PostcraftConfig, Vec<ConfigError>> {
    match path {
        Some(path) => postcraft_config::load_and_validate_path(path),
        None => postcraft_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config_file.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            postcraft_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => {
            init_tracing(&config.server.log_level);
            serve::run_serve(config).await
        }
        Some(Commands::Shell) => {
            // Keep the prompt readable; RUST_LOG still overrides.
            init_tracing("warn");
            shell::run_shell(config).await
        }
        Some(Commands::Config {
            action: ConfigCommand::Check,
        }) => {
            report_config(&config);
            Ok(())
        }
        None => {
            println!("postcraft: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

/// Prints the outcome of `postcraft config check`. Loading already failed
/// with diagnostics if anything was invalid.
fn report_config(config: &PostcraftConfig) {
    println!("{}", "configuration OK".green());
    println!("  listen: {}:{}", config.server.host, config.server.port);
    println!("  database: {}", config.storage.database_path);
    println!("  schedule list: {}", config.client.schedule_path);

    let missing = postcraft_config::missing_secrets(config);
    for key in &missing {
        println!("  {} {key} is not set", "warning:".yellow());
    }
    if !missing.is_empty() {
        println!(
            "{}",
            "endpoints that need these secrets will answer 500".dimmed()
        );
    }
}

/// Initializes the global tracing subscriber. `RUST_LOG` takes precedence.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("postcraft={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
