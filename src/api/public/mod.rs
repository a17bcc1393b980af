//
//  gh-actions-client
//  api/public/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Public REST resources.
//!
//! [`GitHubApi`] is the documented root. Users, organizations and
//! repositories hang directly off it. Everything else is reached through
//! them:
//!
//! | Module | Resources |
//! |--------|-----------|
//! | [`users`] | [`User`], [`Organization`], [`Keys`] |
//! | [`repositories`] | [`Repository`], [`GitHubPages`], [`Readme`] |
//! | [`issues`] | [`Issue`] |
//! | [`actions`] | [`Actions`] and its artifacts, runs, secrets and workflows |
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_actions_client::api::public::GitHubApi;
//!
//! let api = GitHubApi::from_env(None)?;
//! let repo = api.repo("octocat", "hello-world");
//! let issue = repo.issue(7);
//! issue.comment("Thanks for the report!")?;
//! println!("issue node id: {}", issue.node_id()?);
//! # Ok::<(), gh_actions_client::api::common::ApiError>(())
//! ```

pub mod actions;
pub mod issues;
pub mod repositories;
pub mod users;

pub use actions::*;
pub use issues::*;
pub use repositories::*;
pub use users::*;

use std::ops::Deref;

use serde_json::Value;

use super::client::ApiClient;
use super::common::{ApiResult, RawResponse, Request};
use super::node::{ApiNode, ResourceKind};
use crate::config::RunnerEnv;

/// The documented REST/GraphQL root.
#[derive(Debug)]
pub struct GitHubApi {
    client: ApiClient,
}

impl GitHubApi {
    /// Wraps an already configured public client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Builds the root from an explicit runner environment.
    pub fn with_env(token: Option<&str>, env: RunnerEnv) -> ApiResult<Self> {
        Ok(Self::new(ApiClient::github(token, env)?))
    }

    /// Builds the root from the process environment.
    pub fn from_env(token: Option<&str>) -> ApiResult<Self> {
        Ok(Self::new(ApiClient::from_env(token)?))
    }

    /// The underlying dispatcher.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// `repos/<owner>/<name>/`
    pub fn repo(&self, owner: &str, name: &str) -> Repository<'_> {
        Repository::attached(&self.client, owner, name)
    }

    /// The repository the current workflow runs in (`GITHUB_REPOSITORY`).
    pub fn current_repo(&self) -> ApiResult<Repository<'_>> {
        let (owner, name) = self.client.env().repository()?;
        Ok(self.repo(&owner, &name))
    }

    /// `orgs/<name>/`
    pub fn org(&self, name: &str) -> Organization<'_> {
        Organization(ApiNode::new(
            &self.client,
            ResourceKind::Organization {
                name: name.to_string(),
            },
        ))
    }

    /// `users/<name>/`
    pub fn user(&self, name: &str) -> User<'_> {
        User(ApiNode::new(
            &self.client,
            ResourceKind::User {
                name: name.to_string(),
            },
        ))
    }
}

impl Deref for GitHubApi {
    type Target = ApiClient;

    fn deref(&self) -> &ApiClient {
        &self.client
    }
}

/// Blocking and unblocking accounts, available on the root, users and
/// organizations.
pub trait BlockList {
    /// Sends a request relative to the implementor.
    fn send_blocks_request(&self, path: &str, request: Request) -> ApiResult<RawResponse>;

    /// `GET blocks`
    fn blocks(&self) -> ApiResult<Vec<Value>> {
        self.send_blocks_request("blocks", Request::get())?.json()
    }

    /// `PUT blocks/<user>`
    fn block(&self, user: &str) -> ApiResult<()> {
        self.send_blocks_request(&format!("blocks/{}", user), Request::new().method("PUT"))?;
        Ok(())
    }

    /// `DELETE blocks/<user>`
    fn unblock(&self, user: &str) -> ApiResult<()> {
        self.send_blocks_request(&format!("blocks/{}", user), Request::delete())?;
        Ok(())
    }
}

impl BlockList for GitHubApi {
    fn send_blocks_request(&self, path: &str, request: Request) -> ApiResult<RawResponse> {
        self.client.request(path, request)
    }
}

impl BlockList for User<'_> {
    fn send_blocks_request(&self, path: &str, request: Request) -> ApiResult<RawResponse> {
        self.request(path, request)
    }
}

impl BlockList for Organization<'_> {
    fn send_blocks_request(&self, path: &str, request: Request) -> ApiResult<RawResponse> {
        self.request(path, request)
    }
}
