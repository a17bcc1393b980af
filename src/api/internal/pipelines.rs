//
//  gh-actions-client
//  api/internal/pipelines.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Artifact containers on the pipelines service.
//!
//! Uploading an artifact is a three step session:
//!
//! ```text
//! POST  pipelines/workflows/<run>/artifacts             create the container
//! PUT   resources/Containers/<id>?itemPath=<name>/<f>   once per file
//! PATCH pipelines/workflows/<run>/artifacts?artifactName=<name>   finalize
//! ```
//!
//! [`ArtifactUpload`] owns a session. It finalizes exactly once, either
//! through [`ArtifactUpload::finish`] or when dropped.

use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::api::client::ApiClient;
use crate::api::common::{ApiError, ApiResult, ByteRange, Request};
use crate::api::node::{resource_view, ApiNode, ResourceKind};
use crate::config::{InternalService, RunnerEnv};

/// Content type of every file upload.
const OCTET_STREAM: &str = "application/octet-stream";

/// Container type requested on creation.
const STORAGE_TYPE: &str = "actions_storage";

resource_view!(
    /// `pipelines/`
    Pipelines
);
resource_view!(
    /// `pipelines/workflows/<run>/`
    PipelineRun
);
resource_view!(
    /// `pipelines/workflows/<run>/artifacts`
    PipelineArtifacts
);
resource_view!(
    /// `resources/`
    Resources
);
resource_view!(
    /// `resources/Containers/`
    Containers
);
resource_view!(
    /// `resources/Containers/<id>`
    ContainerResource
);

/// Root of the pipelines service.
#[derive(Debug)]
pub struct PipelinesApi {
    client: ApiClient,
}

impl PipelinesApi {
    /// Wraps a client built for [`InternalService::Pipelines`].
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Builds the root from an explicit runner environment.
    ///
    /// The token defaults to `ACTIONS_RUNTIME_TOKEN` and the base URL to
    /// `ACTIONS_RUNTIME_URL`, unless `run_instance_id` is given.
    pub fn with_env(
        token: Option<&str>,
        run_instance_id: Option<&str>,
        env: RunnerEnv,
    ) -> ApiResult<Self> {
        Ok(Self::new(ApiClient::internal(
            InternalService::Pipelines,
            token,
            run_instance_id,
            env,
        )?))
    }

    /// Builds the root from the process environment.
    pub fn from_env(token: Option<&str>, run_instance_id: Option<&str>) -> ApiResult<Self> {
        Self::with_env(token, run_instance_id, RunnerEnv::from_process())
    }

    /// `pipelines/`
    pub fn pipelines(&self) -> Pipelines<'_> {
        Pipelines(ApiNode::new(&self.client, ResourceKind::Pipelines))
    }

    /// `resources/`
    pub fn resources(&self) -> Resources<'_> {
        Resources(ApiNode::new(&self.client, ResourceKind::Resources))
    }

    /// Creates a container and returns the session that fills it.
    ///
    /// `run_id` defaults to `GITHUB_RUN_ID`.
    pub fn artifact_upload(
        &self,
        run_id: Option<u64>,
        name: &str,
        retention_days: Option<u32>,
    ) -> ApiResult<ArtifactUpload<'_>> {
        let run_id = match run_id {
            Some(id) => id,
            None => self.client.env().run_id()?,
        };
        let pipelines = self.pipelines();
        let run = pipelines.workflows(Some(run_id))?;
        let container = run.artifacts().create_container(name, retention_days)?;
        debug!(container = container.id, name, "artifact container created");

        Ok(ArtifactUpload {
            api: self,
            run_id,
            name: name.to_string(),
            container,
            files: 0,
            bytes: 0,
            finished: false,
        })
    }

    /// Runs `fill` inside an upload session.
    ///
    /// The container is finalized exactly once whether `fill` succeeds or
    /// not. An error from `fill` wins over an error from finalizing.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gh_actions_client::api::internal::PipelinesApi;
    ///
    /// let api = PipelinesApi::from_env(None, None)?;
    /// api.upload_artifact(None, "reports", Some(5), |upload| {
    ///     upload.put("junit.xml", b"<testsuites/>")?;
    ///     upload.put("coverage/lcov.info", b"TN:\n")?;
    ///     Ok(())
    /// })?;
    /// # Ok::<(), gh_actions_client::api::common::ApiError>(())
    /// ```
    pub fn upload_artifact<T, F>(
        &self,
        run_id: Option<u64>,
        name: &str,
        retention_days: Option<u32>,
        fill: F,
    ) -> ApiResult<T>
    where
        F: FnOnce(&mut ArtifactUpload<'_>) -> ApiResult<T>,
    {
        let mut upload = self.artifact_upload(run_id, name, retention_days)?;
        let result = fill(&mut upload);
        let finalized = upload.finish();
        let value = result?;
        finalized?;
        Ok(value)
    }
}

impl Deref for PipelinesApi {
    type Target = ApiClient;

    fn deref(&self) -> &ApiClient {
        &self.client
    }
}

impl Pipelines<'_> {
    /// `workflows/<run>/`, defaulting to `GITHUB_RUN_ID`.
    pub fn workflows(&self, run_id: Option<u64>) -> ApiResult<PipelineRun<'_>> {
        let run_id = match run_id {
            Some(id) => id,
            None => self.root().env().run_id()?,
        };
        Ok(PipelineRun(self.child(ResourceKind::PipelineRun { run_id })))
    }
}

impl PipelineRun<'_> {
    /// The workflow run id.
    pub fn run_id(&self) -> u64 {
        match self.kind() {
            ResourceKind::PipelineRun { run_id } => *run_id,
            _ => 0,
        }
    }

    /// Artifact containers of the run.
    pub fn artifacts(&self) -> PipelineArtifacts<'_> {
        PipelineArtifacts(self.child(ResourceKind::PipelineArtifacts))
    }
}

impl PipelineArtifacts<'_> {
    /// Creates an artifact container.
    ///
    /// # Errors
    ///
    /// [`ApiError::Format`] when `retention_days` exceeds
    /// `GITHUB_RETENTION_DAYS`, [`ApiError::Configuration`] when a retention
    /// is requested and that variable is missing.
    pub fn create_container(&self, name: &str, retention_days: Option<u32>) -> ApiResult<Container> {
        let mut body = json!({"Type": STORAGE_TYPE, "Name": name});
        if let Some(days) = retention_days {
            let max = self.root().env().retention_days()?;
            if days > max {
                return Err(ApiError::Format(format!(
                    "retention of {} days exceeds the repository maximum of {}",
                    days, max
                )));
            }
            body["RetentionDays"] = json!(days);
        }

        let mut container: Container = self
            .request("", Request::new().method("POST").json(body))?
            .json()?;
        if container.name.is_empty() {
            container.name = name.to_string();
        }
        Ok(container)
    }

    /// Marks the container `name` as complete.
    pub fn finalize(&self, name: &str, body: Value) -> ApiResult<Value> {
        self.request(
            "",
            Request::new()
                .method("PATCH")
                .query("artifactName", name)
                .json(body),
        )?
        .json_or_null()
    }
}

impl Resources<'_> {
    /// `Containers/`
    pub fn containers(&self) -> Containers<'_> {
        Containers(self.child(ResourceKind::Containers))
    }
}

impl Containers<'_> {
    /// One container by id. No request is made.
    pub fn container(&self, id: u64) -> ContainerResource<'_> {
        ContainerResource(self.child(ResourceKind::Container { id }))
    }
}

impl ContainerResource<'_> {
    /// A file inside the container. `item_path` is the full item path,
    /// container name included.
    pub fn file(&self, item_path: &str) -> ContainerFile<'_> {
        ContainerFile {
            container: &self.0,
            item_path: item_path.to_string(),
        }
    }
}

/// A file slot inside a container.
#[derive(Debug)]
pub struct ContainerFile<'a> {
    container: &'a ApiNode<'a>,
    item_path: String,
}

impl ContainerFile<'_> {
    /// The item path sent as `itemPath`.
    pub fn item_path(&self) -> &str {
        &self.item_path
    }

    /// Uploads `content` in one request.
    ///
    /// Non-empty content carries `Content-Range: bytes 0-<len-1>/<len>`.
    pub fn put(&self, content: &[u8]) -> ApiResult<Value> {
        let mut request = Request::new()
            .method("PUT")
            .query("itemPath", &self.item_path)
            .content_type(OCTET_STREAM)
            .bytes(content.to_vec());
        if !content.is_empty() {
            request = request.byte_range(ByteRange::whole(content.len() as u64)?);
        }
        self.container.request("", request)?.json_or_null()
    }
}

/// A created artifact container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    /// Container id, used under `resources/Containers/`
    #[serde(rename = "containerId")]
    pub id: u64,

    /// Artifact name
    #[serde(default)]
    pub name: String,

    /// Expiry timestamp as sent by the service
    #[serde(rename = "expiresOn", default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<String>,
}

impl Container {
    /// Parses [`Container::expires_on`] as RFC 3339.
    ///
    /// Returns `None` when the field is absent or not a valid timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_on
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// An open upload session for one artifact.
///
/// Dropping the session without calling [`ArtifactUpload::finish`] still
/// finalizes the container; a failure at that point can only be logged.
#[derive(Debug)]
pub struct ArtifactUpload<'a> {
    api: &'a PipelinesApi,
    run_id: u64,
    name: String,
    container: Container,
    files: usize,
    bytes: u64,
    finished: bool,
}

impl ArtifactUpload<'_> {
    /// The container backing this session.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// The artifact name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of files uploaded so far.
    pub fn files(&self) -> usize {
        self.files
    }

    /// Number of bytes uploaded so far.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Uploads one file to `<artifact name>/<item_path>`.
    pub fn put(&mut self, item_path: &str, content: &[u8]) -> ApiResult<Value> {
        let full_path = format!("{}/{}", self.name, item_path.trim_start_matches('/'));
        debug!(item = %full_path, len = content.len(), "uploading artifact file");

        let resources = self.api.resources();
        let containers = resources.containers();
        let container = containers.container(self.container.id);
        let reply = container.file(&full_path).put(content)?;

        self.files += 1;
        self.bytes += content.len() as u64;
        Ok(reply)
    }

    /// Finalizes the container and closes the session.
    pub fn finish(mut self) -> ApiResult<Value> {
        self.finished = true;
        self.finalize()
    }

    fn finalize(&self) -> ApiResult<Value> {
        debug!(name = %self.name, files = self.files, "finalizing artifact");
        let pipelines = self.api.pipelines();
        let run = pipelines.workflows(Some(self.run_id))?;
        let artifacts = run.artifacts();
        artifacts.finalize(&self.name, json!({}))
    }
}

impl Drop for ArtifactUpload<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        if let Err(e) = self.finalize() {
            warn!(name = %self.name, error = %e, "failed to finalize abandoned artifact upload");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> RunnerEnv {
        RunnerEnv::from_vars([
            ("ACTIONS_RUNTIME_URL", "https://pipelines.example.com/abc123/"),
            ("ACTIONS_RUNTIME_TOKEN", "runtime-token"),
            ("GITHUB_RUN_ID", "77"),
            ("GITHUB_RETENTION_DAYS", "30"),
        ])
    }

    #[test]
    fn test_base_url_from_runtime_url() {
        let api = PipelinesApi::with_env(None, None, env()).unwrap();
        assert_eq!(api.base_url(), "https://pipelines.example.com/abc123/_apis/");
    }

    #[test]
    fn test_base_url_from_run_instance_id() {
        let api = PipelinesApi::with_env(None, Some("xyz"), env()).unwrap();
        assert_eq!(
            api.base_url(),
            "https://pipelines.actions.githubusercontent.com/xyz/_apis/"
        );
    }

    #[test]
    fn test_missing_runtime_token() {
        let env = RunnerEnv::from_vars([("ACTIONS_RUNTIME_URL", "https://p.example.com/a/")]);
        assert!(matches!(
            PipelinesApi::with_env(None, None, env),
            Err(ApiError::Configuration(_))
        ));
    }

    #[test]
    fn test_run_defaults_to_env() {
        let api = PipelinesApi::with_env(None, None, env()).unwrap();
        let pipelines = api.pipelines();
        assert_eq!(pipelines.workflows(None).unwrap().run_id(), 77);
        assert_eq!(pipelines.workflows(Some(5)).unwrap().run_id(), 5);
    }

    #[test]
    fn test_retention_above_limit_is_rejected() {
        let api = PipelinesApi::with_env(None, None, env()).unwrap();
        let pipelines = api.pipelines();
        let run = pipelines.workflows(None).unwrap();
        assert!(matches!(
            run.artifacts().create_container("logs", Some(31)),
            Err(ApiError::Format(_))
        ));
    }

    #[test]
    fn test_container_expiry() {
        let container: Container = serde_json::from_value(json!({
            "containerId": 9,
            "name": "logs",
            "expiresOn": "2026-03-01T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(container.id, 9);
        assert_eq!(
            container.expires_at().unwrap().to_rfc3339(),
            "2026-03-01T12:00:00+00:00"
        );

        let container: Container = serde_json::from_value(json!({"containerId": 1})).unwrap();
        assert!(container.expires_at().is_none());
    }
}
