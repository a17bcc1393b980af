//
//  gh-actions-client
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the HTTP dispatcher and the resource tree for the
//! GitHub REST/GraphQL API and for the runner's internal services.
//!
//! ## Supported Roots
//!
//! - **Public API**: REST at `api.github.com` (or `GITHUB_API_URL`) plus GraphQL
//! - **Pipelines service**: artifact containers of the current run
//! - **Artifact cache service**: dependency cache lookups
//!
//! ## Architecture
//!
//! - [`client`]: The dispatcher with header composition and pagination
//! - [`node`]: Resource nodes and path composition
//! - [`public`]: Users, organizations, repositories, issues, Actions
//! - [`internal`]: Pipelines and artifact-cache services
//! - [`common`]: Shared types (errors, requests, media types, node ids)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gh_actions_client::api::public::GitHubApi;
//! use gh_actions_client::api::internal::PipelinesApi;
//!
//! // Inside a workflow run, both roots configure themselves from the
//! // environment the runner exports.
//! let github = GitHubApi::from_env(None)?;
//! let repo = github.current_repo()?;
//! println!("{} has id {}", repo.full_name(), repo.database_id()?);
//!
//! let pipelines = PipelinesApi::from_env(None, None)?;
//! pipelines.upload_artifact(None, "notes", None, |upload| {
//!     upload.put("notes.txt", b"built ok")
//! })?;
//! # Ok::<(), gh_actions_client::api::ApiError>(())
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`ApiResult`]. Nothing is retried; an error status
//! surfaces as [`ApiError::Http`] carrying the status and the body.

/// The request dispatcher at the root of every resource tree.
pub mod client;

/// Shared request, response and identifier types.
pub mod common;

/// Runner-internal services.
pub mod internal;

/// Resource nodes.
pub mod node;

/// Documented REST resources.
pub mod public;

pub use client::{ApiClient, Flavor, Pages};
pub use common::{ApiError, ApiResult, MediaType, PageRange, RawResponse, Request};
pub use node::{ApiNode, ResourceKind};
