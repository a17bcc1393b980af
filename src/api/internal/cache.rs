//
//  gh-actions-client
//  api/internal/cache.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Dependency cache lookups on the artifact-cache service.

use std::ops::Deref;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::api::client::ApiClient;
use crate::api::common::{ApiError, ApiResult, Request};
use crate::api::node::{resource_view, ApiNode, ResourceKind};
use crate::config::{InternalService, RunnerEnv};

resource_view!(
    /// `artifactcache/`
    Cache
);

/// Root of the artifact-cache service.
#[derive(Debug)]
pub struct ArtifactCacheApi {
    client: ApiClient,
}

impl ArtifactCacheApi {
    /// Wraps a client built for [`InternalService::ArtifactCache`].
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Builds the root from an explicit runner environment.
    ///
    /// The base URL comes from `ACTIONS_CACHE_URL` unless `run_instance_id`
    /// is given.
    pub fn with_env(
        token: Option<&str>,
        run_instance_id: Option<&str>,
        env: RunnerEnv,
    ) -> ApiResult<Self> {
        Ok(Self::new(ApiClient::internal(
            InternalService::ArtifactCache,
            token,
            run_instance_id,
            env,
        )?))
    }

    /// Builds the root from the process environment.
    pub fn from_env(token: Option<&str>, run_instance_id: Option<&str>) -> ApiResult<Self> {
        Self::with_env(token, run_instance_id, RunnerEnv::from_process())
    }

    /// `artifactcache/`
    pub fn cache(&self) -> Cache<'_> {
        Cache(ApiNode::new(&self.client, ResourceKind::Cache))
    }
}

impl Deref for ArtifactCacheApi {
    type Target = ApiClient;

    fn deref(&self) -> &ApiClient {
        &self.client
    }
}

/// A cache hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// The key that matched, possibly one of the restore prefixes
    pub cache_key: Option<String>,
    /// Branch scope the entry was saved from
    pub scope: Option<String>,
    /// Signed URL of the archive
    pub archive_location: Option<String>,
    /// When the entry was saved
    pub creation_time: Option<String>,
}

impl Cache<'_> {
    /// Looks up the first entry matching `keys` in order.
    ///
    /// Returns `Ok(None)` on a miss (`204 No Content`).
    pub fn lookup(&self, keys: &[&str], version: &str) -> ApiResult<Option<CacheEntry>> {
        if keys.is_empty() {
            return Err(ApiError::Format("at least one cache key is required".to_string()));
        }
        let response = self.request(
            "cache",
            Request::get()
                .query("keys", keys.join(","))
                .query("version", version),
        )?;
        if response.status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        Ok(Some(response.json()?))
    }
}
