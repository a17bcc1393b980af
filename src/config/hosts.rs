//
//  gh-actions-client
//  config/hosts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Host Configuration Module
//!
//! Well-known hostnames and base-URL helpers for the public API and the two
//! internal runner services.
//!
//! ## Overview
//!
//! | Root | Base URL |
//! |------|----------|
//! | Public REST/GraphQL | `GITHUB_API_URL/` or [`DEFAULT_API_BASE`] |
//! | Pipelines service | `ACTIONS_RUNTIME_URL` + `_apis/` |
//! | Artifact cache service | `ACTIONS_CACHE_URL` + `_apis/` |
//!
//! When a run instance id is known, the internal roots can also be addressed
//! directly through `https://<subdomain>.actions.githubusercontent.com/<id>/_apis/`.
//!
//! ## Usage
//!
//! ```rust
//! use gh_actions_client::config::{internal_service_url, normalize_base_url, InternalService};
//!
//! assert_eq!(normalize_base_url("https://ghe.example.com/api/v3"), "https://ghe.example.com/api/v3/");
//! assert_eq!(
//!     internal_service_url(InternalService::Pipelines.subdomain(), "abc"),
//!     "https://pipelines.actions.githubusercontent.com/abc/_apis/"
//! );
//! ```

use std::fmt;

/// Base URL of the public REST API.
///
/// # Value
///
/// `"https://api.github.com/"`
pub const DEFAULT_API_BASE: &str = "https://api.github.com/";

/// Web front-end used when `GITHUB_SERVER_URL` is absent.
pub const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Host serving raw repository files.
pub const USER_CONTENT_DOMAIN: &str = "raw.githubusercontent.com";

/// Parent domain of the internal runner services.
pub const ACTIONS_CONTENT_DOMAIN: &str = "actions.githubusercontent.com";

/// Path suffix appended to every internal service base.
pub const APIS_SUFFIX: &str = "_apis/";

/// The internal services reachable from inside a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InternalService {
    /// Pipelines and artifact containers
    Pipelines,
    /// Dependency cache
    ArtifactCache,
}

impl InternalService {
    /// Subdomain under [`ACTIONS_CONTENT_DOMAIN`].
    pub fn subdomain(&self) -> &'static str {
        match self {
            Self::Pipelines => "pipelines",
            Self::ArtifactCache => "artifactcache",
        }
    }

    /// The `ACTIONS_*` variable (without prefix) holding the run-specific URL.
    pub fn url_key(&self) -> &'static str {
        match self {
            Self::Pipelines => "RUNTIME_URL",
            Self::ArtifactCache => "CACHE_URL",
        }
    }
}

impl fmt::Display for InternalService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subdomain())
    }
}

/// Normalizes a base URL so it ends in exactly one `/`.
///
/// Surrounding whitespace is trimmed. Relative paths are later appended
/// directly, so the trailing slash is significant.
///
/// # Examples
///
/// ```rust
/// use gh_actions_client::config::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://api.github.com"), "https://api.github.com/");
/// assert_eq!(normalize_base_url(" https://api.github.com// "), "https://api.github.com/");
/// ```
pub fn normalize_base_url(url: &str) -> String {
    format!("{}/", url.trim().trim_end_matches('/'))
}

/// Builds the base URL of an internal service addressed by run instance id.
pub fn internal_service_url(subdomain: &str, run_instance_id: &str) -> String {
    format!(
        "https://{}.{}/{}/{}",
        subdomain, ACTIONS_CONTENT_DOMAIN, run_instance_id, APIS_SUFFIX
    )
}

/// Derives an internal service base from a run-specific URL such as
/// `ACTIONS_RUNTIME_URL`.
pub fn runtime_service_url(runtime_url: &str) -> String {
    format!("{}{}", normalize_base_url(runtime_url), APIS_SUFFIX)
}
