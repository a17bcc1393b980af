//
//  gh-actions-client
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Runner configuration comes entirely from the process environment of a
//! workflow job. This module snapshots the relevant variables into a
//! [`RunnerEnv`] and exposes typed accessors for the values the roots need.
//!
//! ## Overview
//!
//! Variables are grouped by prefix, with the prefix stripped:
//!
//! | Prefix | Namespace | Example |
//! |--------|-----------|---------|
//! | `GITHUB_` | [`Namespace::Github`] | `GITHUB_RUN_ID` → `RUN_ID` |
//! | `ACTIONS_` | [`Namespace::Actions`] | `ACTIONS_RUNTIME_TOKEN` → `RUNTIME_TOKEN` |
//! | `INPUT_` | [`Namespace::Input`] | `INPUT_GITHUB_TOKEN` → `GITHUB_TOKEN` |
//!
//! `HOME` is kept on its own. Keys naming filesystem locations (`WORKSPACE`,
//! `WORKFLOW`, `HOME` and anything ending in `_PATH`) are exposed as paths.
//!
//! ## Usage
//!
//! ```rust
//! use gh_actions_client::config::RunnerEnv;
//!
//! let env = RunnerEnv::from_vars([
//!     ("GITHUB_REPOSITORY", "octocat/hello-world"),
//!     ("GITHUB_RUN_ID", "42"),
//! ]);
//!
//! assert_eq!(env.run_id().unwrap(), 42);
//! assert_eq!(env.repository().unwrap(), ("octocat".to_string(), "hello-world".to_string()));
//! assert_eq!(env.api_url(), "https://api.github.com/");
//! ```
//!
//! ## Submodules
//!
//! - [`hosts`]: Well-known hosts and base-URL helpers

pub mod hosts;

pub use hosts::*;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::Value;
use url::Url;

use crate::api::common::{ApiError, ApiResult};

/// Variable groups recognised in the runner environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `GITHUB_*`
    Github,
    /// `ACTIONS_*`
    Actions,
    /// `INPUT_*`
    Input,
}

impl Namespace {
    /// All namespaces, in lookup order.
    pub const ALL: [Namespace; 3] = [Namespace::Github, Namespace::Actions, Namespace::Input];

    /// The variable prefix, including the trailing underscore.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Github => "GITHUB_",
            Self::Actions => "ACTIONS_",
            Self::Input => "INPUT_",
        }
    }
}

/// Returns `true` for keys whose values are filesystem paths.
pub fn is_path_key(key: &str) -> bool {
    matches!(key, "WORKSPACE" | "WORKFLOW" | "HOME") || key.ends_with("_PATH")
}

/// Snapshot of the runner environment.
///
/// Built once per session and shared read-only by the roots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerEnv {
    github: BTreeMap<String, String>,
    actions: BTreeMap<String, String>,
    input: BTreeMap<String, String>,
    home: Option<PathBuf>,
}

impl RunnerEnv {
    /// Captures the current process environment.
    pub fn from_process() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Builds an environment from arbitrary `(name, value)` pairs.
    ///
    /// Variables outside the known prefixes are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut env = Self::default();
        for (name, value) in vars {
            let name = name.as_ref();
            if name == "HOME" {
                env.home = Some(PathBuf::from(value.into()));
                continue;
            }
            for namespace in Namespace::ALL {
                if let Some(key) = name.strip_prefix(namespace.prefix()) {
                    env.table_mut(namespace).insert(key.to_string(), value.into());
                    break;
                }
            }
        }
        env
    }

    fn table(&self, namespace: Namespace) -> &BTreeMap<String, String> {
        match namespace {
            Namespace::Github => &self.github,
            Namespace::Actions => &self.actions,
            Namespace::Input => &self.input,
        }
    }

    fn table_mut(&mut self, namespace: Namespace) -> &mut BTreeMap<String, String> {
        match namespace {
            Namespace::Github => &mut self.github,
            Namespace::Actions => &mut self.actions,
            Namespace::Input => &mut self.input,
        }
    }

    /// Looks up a key (without prefix) in a namespace.
    pub fn get(&self, namespace: Namespace, key: &str) -> Option<&str> {
        self.table(namespace).get(key).map(String::as_str)
    }

    /// Looks up a path-typed key. Returns `None` for keys that are not paths.
    pub fn get_path(&self, namespace: Namespace, key: &str) -> Option<PathBuf> {
        if !is_path_key(key) {
            return None;
        }
        self.get(namespace, key).map(PathBuf::from)
    }

    /// Every key present in a namespace.
    pub fn keys(&self, namespace: Namespace) -> impl Iterator<Item = &str> {
        self.table(namespace).keys().map(String::as_str)
    }

    /// `HOME`, if set.
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Looks up a key that must be present.
    pub fn require(&self, namespace: Namespace, key: &str) -> ApiResult<&str> {
        self.get(namespace, key).ok_or_else(|| {
            ApiError::Configuration(format!("{}{} is not set", namespace.prefix(), key))
        })
    }

    fn require_parsed<T: FromStr>(&self, namespace: Namespace, key: &str) -> ApiResult<T> {
        let raw = self.require(namespace, key)?;
        raw.trim().parse().map_err(|_| {
            ApiError::Configuration(format!(
                "{}{} is not a valid number: {:?}",
                namespace.prefix(),
                key,
                raw
            ))
        })
    }

    fn require_path(&self, namespace: Namespace, key: &str) -> ApiResult<PathBuf> {
        self.require(namespace, key).map(PathBuf::from)
    }

    /// REST base URL, always ending in `/`.
    pub fn api_url(&self) -> String {
        match self.get(Namespace::Github, "API_URL") {
            Some(url) if !url.trim().is_empty() => normalize_base_url(url),
            _ => DEFAULT_API_BASE.to_string(),
        }
    }

    /// GraphQL endpoint.
    pub fn graphql_url(&self) -> String {
        match self.get(Namespace::Github, "GRAPHQL_URL") {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => format!("{}graphql", self.api_url()),
        }
    }

    /// Web front-end URL, without a trailing `/`.
    pub fn server_url(&self) -> String {
        self.get(Namespace::Github, "SERVER_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }

    /// Token for the public API: `GITHUB_TOKEN`, then `INPUT_GITHUB_TOKEN`.
    pub fn public_token(&self) -> Option<&str> {
        self.get(Namespace::Github, "TOKEN")
            .or_else(|| self.get(Namespace::Input, "GITHUB_TOKEN"))
            .filter(|token| !token.is_empty())
    }

    /// `ACTIONS_RUNTIME_TOKEN`.
    pub fn runtime_token(&self) -> ApiResult<&str> {
        self.require(Namespace::Actions, "RUNTIME_TOKEN")
    }

    /// `ACTIONS_RUNTIME_URL`.
    pub fn runtime_url(&self) -> ApiResult<&str> {
        self.require(Namespace::Actions, "RUNTIME_URL")
    }

    /// `ACTIONS_CACHE_URL`.
    pub fn cache_url(&self) -> ApiResult<&str> {
        self.require(Namespace::Actions, "CACHE_URL")
    }

    /// The run-specific URL of an internal service.
    pub fn service_url(&self, service: InternalService) -> ApiResult<&str> {
        self.require(Namespace::Actions, service.url_key())
    }

    /// `GITHUB_RUN_ID`.
    pub fn run_id(&self) -> ApiResult<u64> {
        self.require_parsed(Namespace::Github, "RUN_ID")
    }

    /// `GITHUB_RETENTION_DAYS`, the longest artifact retention allowed.
    pub fn retention_days(&self) -> ApiResult<u32> {
        self.require_parsed(Namespace::Github, "RETENTION_DAYS")
    }

    /// `GITHUB_REPOSITORY` split into `(owner, name)`.
    pub fn repository(&self) -> ApiResult<(String, String)> {
        let full = self.require(Namespace::Github, "REPOSITORY")?;
        match full.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok((owner.to_string(), name.to_string()))
            }
            _ => Err(ApiError::Configuration(format!(
                "GITHUB_REPOSITORY must look like owner/name: {:?}",
                full
            ))),
        }
    }

    /// `GITHUB_EVENT_PATH`.
    pub fn event_path(&self) -> ApiResult<PathBuf> {
        self.require_path(Namespace::Github, "EVENT_PATH")
    }

    /// Reads and parses the event payload that triggered the run.
    pub fn event(&self) -> ApiResult<Value> {
        let text = std::fs::read_to_string(self.event_path()?)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// `GITHUB_WORKSPACE`.
    pub fn workspace(&self) -> ApiResult<PathBuf> {
        self.require_path(Namespace::Github, "WORKSPACE")
    }

    /// The run instance id: the first path segment of `ACTIONS_RUNTIME_URL`,
    /// or of `ACTIONS_CACHE_URL` when the former is absent.
    pub fn run_instance_id(&self) -> ApiResult<String> {
        let raw = self
            .get(Namespace::Actions, "RUNTIME_URL")
            .or_else(|| self.get(Namespace::Actions, "CACHE_URL"))
            .ok_or_else(|| {
                ApiError::Configuration(
                    "neither ACTIONS_RUNTIME_URL nor ACTIONS_CACHE_URL is set".to_string(),
                )
            })?;

        let url = Url::parse(raw)
            .map_err(|e| ApiError::Configuration(format!("invalid runtime URL {:?}: {}", raw, e)))?;

        url.path_segments()
            .and_then(|mut segments| segments.find(|s| !s.is_empty()))
            .map(str::to_string)
            .ok_or_else(|| {
                ApiError::Configuration(format!("runtime URL has no instance id: {}", raw))
            })
    }
}
