//
//  gh-actions-client
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gh_actions_client::api::ApiError;
use gh_actions_client::cli::{Cli, Commands};
use gh_actions_client::exit_codes;

fn main() {
    // Initialize logging
    init_logging();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command and exit
    match run(cli) {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_code(&e));
        }
    }
}

/// Initialize logging based on environment
fn init_logging() {
    let filter = EnvFilter::try_from_env("GHA_DEBUG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<ApiError>() {
        Some(ApiError::Configuration(_)) => exit_codes::AUTH_ERROR,
        Some(e) if e.status() == Some(reqwest::StatusCode::UNAUTHORIZED) => exit_codes::AUTH_ERROR,
        _ => exit_codes::ERROR,
    }
}

/// Main command dispatcher
fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Artifact(cmd) => cmd.run(&cli.global),
        Commands::Api(cmd) => cmd.run(&cli.global),
        Commands::NodeId(cmd) => cmd.run(&cli.global),
        Commands::Version => {
            println!("gha version {}", gh_actions_client::VERSION);
            Ok(())
        }
    }
}
