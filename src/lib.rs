//
//  gh-actions-client
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # GitHub Actions Client Library
//!
//! A synchronous client for the GitHub REST and GraphQL APIs and for the
//! undocumented services a workflow runner talks to, meant for automation
//! running inside a job.
//!
//! ## Overview
//!
//! Every resource is a node in a tree rooted at an [`api::ApiClient`]. A
//! node only knows its own path segment; requests travel up the tree and
//! the root sends them. Nodes memoise their database id and metadata.
//!
//! ## Features
//!
//! - **Dispatcher**: header composition, media types, previews, byte ranges
//! - **Pagination**: lazy page iterators driven by `Link: rel="next"`
//! - **Node ids**: lossless database id ⇄ node id conversion
//! - **Artifacts**: container create / upload / finalize sessions
//! - **Cache**: dependency cache lookups
//!
//! ## Module Structure
//!
//! - [`api`]: Dispatcher, resource nodes, public and internal resources
//! - [`auth`]: Credentials and token resolution
//! - [`config`]: Runner environment and service URLs
//! - [`cli`]: Command-line interface definitions using clap
//! - [`util`]: Formatting helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use gh_actions_client::api::public::GitHubApi;
//!
//! let api = GitHubApi::from_env(None)?;
//! let repo = api.current_repo()?;
//! for issue in repo.issues(&["bug"], Some("open"))? {
//!     println!("#{} {}", issue["number"], issue["title"]);
//! }
//! # Ok::<(), gh_actions_client::api::ApiError>(())
//! ```

/// Command-line interface definitions.
pub mod cli;

/// HTTP dispatcher and resource tree.
///
/// The clients handle authentication, request building, pagination, and
/// error mapping for the public API and the runner services.
pub mod api;

/// Credentials and token resolution.
pub mod auth;

/// Runner environment and service base URLs.
pub mod config;

/// Utility functions and helpers.
pub mod util;

/// Re-export of the main CLI struct for convenient access.
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use gh_actions_client::Cli;
///
/// let cli = Cli::parse();
/// // Handle cli.command...
/// ```
pub use cli::Cli;

/// Re-export of the runner environment.
pub use config::RunnerEnv;

/// Application name constant.
///
/// The name of the CLI binary, also sent in the default `User-Agent`.
pub const APP_NAME: &str = "gha";

/// Application version constant, taken from Cargo.toml at compile time.
///
/// # Example
///
/// ```rust
/// use gh_actions_client::VERSION;
///
/// println!("gha version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// # Example
///
/// ```rust,no_run
/// use gh_actions_client::exit_codes;
/// use std::process;
///
/// process::exit(exit_codes::AUTH_ERROR);
/// ```
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error.
    ///
    /// An unspecified error occurred during execution.
    /// Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments.
    ///
    /// Use `--help` to see correct usage.
    pub const USAGE: i32 = 2;

    /// Authentication or runner configuration missing.
    ///
    /// A token or a required `GITHUB_*`/`ACTIONS_*` variable is absent or
    /// unusable.
    pub const AUTH_ERROR: i32 = 4;
}
