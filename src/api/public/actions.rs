//
//  gh-actions-client
//  api/public/actions.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! GitHub Actions resources of a repository or organization.
//!
//! ```text
//! actions/
//! ├── artifacts/        list, <id>/ (info, download, delete)
//! ├── runs/             list, <id>/ (info, rerun, cancel, logs, timing, artifacts)
//! ├── secrets/          public-key, list, <name> (info, put, delete, repositories)
//! └── workflows/        list, <id>/ (info, timing)
//! ```
//!
//! Listing endpoints wrap their items in an object alongside
//! `total_count`; the helpers here walk every page and return the items.
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_actions_client::api::public::GitHubApi;
//! use serde_json::json;
//!
//! let api = GitHubApi::from_env(None)?;
//! let repo = api.current_repo()?;
//! let actions = repo.actions();
//! let runs = actions.runs();
//!
//! for run in runs.list(json!({"status": "failure", "branch": "main"}))? {
//!     println!("{} {}", run["id"], run["name"]);
//! }
//! # Ok::<(), gh_actions_client::api::common::ApiError>(())
//! ```

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::common::{ApiError, ApiResult, PageRange, Request};
use crate::api::node::{resource_view, ApiNode, ResourceKind};

resource_view!(
    /// `actions/` of a repository or organization.
    Actions
);
resource_view!(
    /// `artifacts/`
    Artifacts
);
resource_view!(
    /// `artifacts/<id>/`
    Artifact
);
resource_view!(
    /// `runs/`
    Runs
);
resource_view!(
    /// `runs/<id>/`
    WorkflowRun
);
resource_view!(
    /// `secrets/`
    Secrets
);
resource_view!(
    /// `workflows/`
    Workflows
);
resource_view!(
    /// `workflows/<id>/`
    Workflow
);

/// A page of a wrapped listing.
trait Listing: DeserializeOwned {
    fn into_items(self) -> Vec<Value>;
}

#[derive(Debug, Deserialize)]
struct ArtifactList {
    #[serde(default)]
    artifacts: Vec<Value>,
}

impl Listing for ArtifactList {
    fn into_items(self) -> Vec<Value> {
        self.artifacts
    }
}

#[derive(Debug, Deserialize)]
struct RunList {
    #[serde(default)]
    workflow_runs: Vec<Value>,
}

impl Listing for RunList {
    fn into_items(self) -> Vec<Value> {
        self.workflow_runs
    }
}

#[derive(Debug, Deserialize)]
struct SecretList {
    #[serde(default)]
    secrets: Vec<Value>,
}

impl Listing for SecretList {
    fn into_items(self) -> Vec<Value> {
        self.secrets
    }
}

#[derive(Debug, Deserialize)]
struct RepositoryList {
    #[serde(default)]
    repositories: Vec<Value>,
}

impl Listing for RepositoryList {
    fn into_items(self) -> Vec<Value> {
        self.repositories
    }
}

#[derive(Debug, Deserialize)]
struct WorkflowList {
    #[serde(default)]
    workflows: Vec<Value>,
}

impl Listing for WorkflowList {
    fn into_items(self) -> Vec<Value> {
        self.workflows
    }
}

fn list_wrapped<L: Listing>(node: &ApiNode<'_>, path: &str, request: Request) -> ApiResult<Vec<Value>> {
    let mut items = Vec::new();
    for page in node.request_pages(path, request, PageRange::all())? {
        items.extend(page?.json::<L>()?.into_items());
    }
    Ok(items)
}

impl Actions<'_> {
    /// Build artifacts.
    pub fn artifacts(&self) -> Artifacts<'_> {
        Artifacts(self.child(ResourceKind::Artifacts))
    }

    /// Workflow runs.
    pub fn runs(&self) -> Runs<'_> {
        Runs(self.child(ResourceKind::Runs))
    }

    /// Encrypted secrets.
    pub fn secrets(&self) -> Secrets<'_> {
        Secrets(self.child(ResourceKind::Secrets))
    }

    /// Workflow definitions.
    pub fn workflows(&self) -> Workflows<'_> {
        Workflows(self.child(ResourceKind::Workflows))
    }
}

impl Artifacts<'_> {
    /// Every artifact, all pages.
    pub fn list(&self) -> ApiResult<Vec<Value>> {
        list_wrapped::<ArtifactList>(self, "", Request::get())
    }

    /// One artifact. No request is made.
    pub fn artifact(&self, id: u64) -> Artifact<'_> {
        Artifact(self.child(ResourceKind::Artifact { id }))
    }
}

impl Artifact<'_> {
    /// The artifact id.
    pub fn id(&self) -> u64 {
        self.kind().intrinsic_id().unwrap_or_default()
    }

    /// Downloads the archive. `format` is currently always `zip`.
    pub fn download(&self, format: &str) -> ApiResult<Vec<u8>> {
        Ok(self.request(format, Request::get())?.body)
    }

    /// Deletes the artifact.
    pub fn delete(&self) -> ApiResult<()> {
        self.request("", Request::delete())?;
        Ok(())
    }
}

impl Runs<'_> {
    /// Every run matching `filters`, all pages.
    ///
    /// `filters` is an object such as `{"branch": "main", "status": "failure"}`
    /// and is sent as query parameters; `null` lists everything.
    pub fn list(&self, filters: Value) -> ApiResult<Vec<Value>> {
        let request = match filters {
            Value::Null => Request::get(),
            filters => Request::get().json(filters),
        };
        list_wrapped::<RunList>(self, "", request)
    }

    /// One run. No request is made.
    pub fn run(&self, id: u64) -> WorkflowRun<'_> {
        WorkflowRun(self.child(ResourceKind::WorkflowRun { id }))
    }
}

impl WorkflowRun<'_> {
    /// The run id.
    pub fn id(&self) -> u64 {
        self.kind().intrinsic_id().unwrap_or_default()
    }

    /// Re-runs every job of the run.
    pub fn rerun(&self) -> ApiResult<()> {
        self.request("rerun", Request::new().method("POST"))?;
        Ok(())
    }

    /// Cancels the run.
    pub fn cancel(&self) -> ApiResult<()> {
        self.request("cancel", Request::new().method("POST"))?;
        Ok(())
    }

    /// Artifacts produced by the run, all pages.
    pub fn artifacts(&self) -> ApiResult<Vec<Value>> {
        list_wrapped::<ArtifactList>(self, "artifacts", Request::get())
    }

    /// The log archive (zip).
    pub fn logs(&self) -> ApiResult<Vec<u8>> {
        Ok(self.request("logs", Request::get())?.body)
    }

    /// Billable time per runner OS.
    pub fn timing(&self) -> ApiResult<Value> {
        self.request("timing", Request::get())?.json()
    }
}

impl Secrets<'_> {
    /// The public key secrets must be sealed with before [`Secrets::put`].
    pub fn public_key(&self) -> ApiResult<Value> {
        self.request("public-key", Request::get())?.json()
    }

    /// Every secret (names and timestamps only), all pages.
    pub fn list(&self) -> ApiResult<Vec<Value>> {
        list_wrapped::<SecretList>(self, "", Request::get())
    }

    /// Metadata of one secret.
    pub fn info(&self, name: &str) -> ApiResult<Value> {
        self.request(name, Request::get())?.json()
    }

    /// Creates or updates a secret.
    ///
    /// `encrypted_value` is the base64 of the value sealed with the key
    /// returned by [`Secrets::public_key`], whose id is `key_id`.
    pub fn put(&self, name: &str, encrypted_value: &str, key_id: &str) -> ApiResult<()> {
        if name.is_empty() {
            return Err(ApiError::Format("secret name must not be empty".to_string()));
        }
        self.request(
            name,
            Request::new().method("PUT").json(json!({
                "encrypted_value": encrypted_value,
                "key_id": key_id,
            })),
        )?;
        Ok(())
    }

    /// Deletes a secret.
    pub fn delete(&self, name: &str) -> ApiResult<()> {
        self.request(name, Request::delete())?;
        Ok(())
    }

    /// Repositories an organization secret is visible to.
    pub fn repositories(&self, name: &str) -> ApiResult<Vec<Value>> {
        list_wrapped::<RepositoryList>(self, &format!("{}/repositories", name), Request::get())
    }

    /// Replaces the repositories an organization secret is visible to.
    pub fn set_repositories(&self, name: &str, repository_ids: &[u64]) -> ApiResult<()> {
        self.request(
            &format!("{}/repositories", name),
            Request::new()
                .method("PUT")
                .json(json!({"selected_repository_ids": repository_ids})),
        )?;
        Ok(())
    }
}

impl Workflows<'_> {
    /// Every workflow, all pages.
    pub fn list(&self) -> ApiResult<Vec<Value>> {
        list_wrapped::<WorkflowList>(self, "", Request::get())
    }

    /// One workflow. No request is made.
    pub fn workflow(&self, id: u64) -> Workflow<'_> {
        Workflow(self.child(ResourceKind::Workflow { id }))
    }
}

impl Workflow<'_> {
    /// Billable time per runner OS.
    pub fn timing(&self) -> ApiResult<Value> {
        self.request("timing", Request::get())?.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::ApiClient;
    use crate::api::public::GitHubApi;

    #[test]
    fn test_intrinsic_ids() {
        let api = GitHubApi::new(ApiClient::new("https://api.example.com").unwrap());
        let repo = api.repo("o", "r");
        let actions = repo.actions();
        let artifacts = actions.artifacts();
        let artifact = artifacts.artifact(11);
        assert_eq!(artifact.id(), 11);
        assert_eq!(artifact.database_id().unwrap(), 11);

        let runs = actions.runs();
        assert_eq!(runs.run(42).id(), 42);
    }

    #[test]
    fn test_secrets_reject_empty_name() {
        let api = GitHubApi::new(ApiClient::new("https://api.example.com").unwrap());
        let org = api.org("acme");
        let actions = org.actions();
        assert!(matches!(
            actions.secrets().put("", "c2VhbGVk", "key"),
            Err(ApiError::Format(_))
        ));
    }

    #[test]
    fn test_listing_wrappers_tolerate_missing_items() {
        let page: RunList = serde_json::from_value(json!({"total_count": 0})).unwrap();
        assert!(page.into_items().is_empty());
    }
}
