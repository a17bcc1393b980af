//
//  gh-actions-client
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod api;
mod artifact;
mod node_id;

pub use api::ApiCommand;
pub use artifact::ArtifactCommand;
pub use node_id::NodeIdCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::api::ApiClient;
use crate::auth::public_credential;
use crate::config::RunnerEnv;

/// gha - Talk to GitHub and the Actions runner services from a workflow
#[derive(Parser, Debug)]
#[command(
    name = "gha",
    version,
    about = "Talk to GitHub and the Actions runner services from a workflow",
    long_about = "gha wraps the GitHub REST/GraphQL API and the runner's internal\n\
                  artifact services for use inside workflow steps.",
    propagate_version = true,
    after_help = "Use 'gha <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Token to authenticate with (defaults to the runner environment)
    #[arg(long, global = true, env = "GHA_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// REST base URL (defaults to GITHUB_API_URL or https://api.github.com/)
    #[arg(long, global = true, env = "GHA_API_URL")]
    pub api_url: Option<String>,

    /// User-Agent header sent with every request
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalOptions {
    /// Builds the public API client these options describe.
    pub fn github_client(&self) -> Result<ApiClient> {
        let env = RunnerEnv::from_process();
        let token = self.token.as_deref();
        let mut client = match &self.api_url {
            Some(url) => {
                let auth = public_credential(token, &env)?;
                ApiClient::new(url)?.with_auth(auth).with_env(env)
            }
            None => ApiClient::github(token, env)?,
        };
        if let Some(user_agent) = &self.user_agent {
            client = client.with_user_agent(user_agent);
        }
        Ok(client)
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload workflow artifacts
    Artifact(ArtifactCommand),

    /// Make API requests
    Api(ApiCommand),

    /// Encode and decode node ids
    #[command(name = "node-id")]
    NodeId(NodeIdCommand),

    /// Print version information
    Version,
}
