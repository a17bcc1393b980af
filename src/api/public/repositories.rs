//
//  gh-actions-client
//  api/public/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository resources.
//!
//! A [`Repository`] addresses `repos/<owner>/<name>/`. Its database id is
//! resolved through GraphQL; its metadata through the generic info fetch.
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_actions_client::api::common::MediaType;
//! use gh_actions_client::api::public::GitHubApi;
//! use serde_json::json;
//!
//! let api = GitHubApi::from_env(None)?;
//! let repo = api.current_repo()?;
//!
//! let readme = repo.readme(MediaType::Raw, None, None)?;
//! println!("{}", readme.text().unwrap_or("<binary>"));
//!
//! repo.create_check_run(json!({"name": "lint", "head_sha": "abc123"}))?;
//! # Ok::<(), gh_actions_client::api::common::ApiError>(())
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};

use super::actions::Actions;
use super::issues::Issue;
use super::users::{Organization, User};
use crate::api::client::ApiClient;
use crate::api::common::{ApiError, ApiResult, MediaType, RawResponse, Request};
use crate::api::node::{resource_view, ApiNode, ResourceKind};
use crate::config::USER_CONTENT_DOMAIN;

resource_view!(
    /// `repos/<owner>/<name>/`
    Repository
);

resource_view!(
    /// `pages/` of a repository.
    GitHubPages
);

impl<'a> Repository<'a> {
    pub(crate) fn attached(root: &'a ApiClient, owner: &str, name: &str) -> Self {
        Self(ApiNode::new(
            root,
            ResourceKind::Repository {
                owner: owner.to_string(),
                name: name.to_string(),
            },
        ))
    }

    pub(crate) fn seeded(self, id: Option<u64>, info: Option<Value>) -> Self {
        Self(self.0.with_database_id(id).with_info(info))
    }

    fn names(&self) -> (&str, &str) {
        match self.kind() {
            ResourceKind::Repository { owner, name } => (owner.as_str(), name.as_str()),
            _ => ("", ""),
        }
    }

    /// The owner login this node was addressed with.
    pub fn owner_login(&self) -> &str {
        self.names().0
    }

    /// The repository name.
    pub fn name(&self) -> &str {
        self.names().1
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        let (owner, name) = self.names();
        format!("{}/{}", owner, name)
    }

    /// An issue of this repository. No request is made.
    pub fn issue(&self, number: u64) -> Issue<'_> {
        Issue(self.child(ResourceKind::Issue { number }))
    }

    /// Lists issues, optionally filtered by labels and state.
    pub fn issues(&self, labels: &[&str], state: Option<&str>) -> ApiResult<Vec<Value>> {
        let mut request = Request::get();
        if !labels.is_empty() {
            request = request.query("labels", labels.join(","));
        }
        if let Some(state) = state {
            request = request.query("state", state);
        }
        self.request("issues", request)?.json()
    }

    /// Removes a collaborator.
    pub fn expel(&self, user: &str) -> ApiResult<()> {
        self.request(&format!("collaborators/{}", user), Request::delete())?;
        Ok(())
    }

    /// Creates a check run.
    pub fn create_check_run(&self, body: Value) -> ApiResult<Value> {
        self.request("check-runs", Request::new().method("POST").json(body))?
            .json()
    }

    /// Updates a check run.
    pub fn update_check_run(&self, id: u64, body: Value) -> ApiResult<Value> {
        self.request(
            &format!("check-runs/{}", id),
            Request::new().method("PATCH").json(body),
        )?
        .json()
    }

    /// Triggers a `repository_dispatch` event carrying `payload`.
    pub fn dispatch(&self, event_type: &str, payload: Value) -> ApiResult<()> {
        self.request(
            "dispatches",
            Request::new().method("POST").json(json!({
                "event_type": event_type,
                "client_payload": payload,
            })),
        )?;
        Ok(())
    }

    /// GitHub Pages settings of this repository.
    pub fn pages(&self) -> GitHubPages<'_> {
        GitHubPages(self.child(ResourceKind::Pages))
    }

    /// Repository-level Actions resources.
    pub fn actions(&self) -> Actions<'_> {
        Actions(self.child(ResourceKind::Actions))
    }

    fn owner_seed(&self) -> (String, Option<u64>, Option<Value>) {
        let owner = self
            .cached_info()
            .and_then(|info| info.get("owner").cloned());
        match owner {
            Some(owner) => {
                let login = owner
                    .get("login")
                    .and_then(Value::as_str)
                    .unwrap_or(self.owner_login())
                    .to_string();
                let id = owner.get("id").and_then(Value::as_u64);
                (login, id, Some(owner))
            }
            None => (self.owner_login().to_string(), None, None),
        }
    }

    /// The owner as a user.
    ///
    /// When the repository metadata is cached, the owner's id and abridged
    /// profile are seeded from it. Counters, social fields and timestamps
    /// are not part of that profile; call `refresh_info` on the result to
    /// get them.
    pub fn owner(&self) -> User<'a> {
        let (name, id, info) = self.owner_seed();
        User(
            ApiNode::new(self.root(), ResourceKind::User { name })
                .with_database_id(id)
                .with_info(info),
        )
    }

    /// The owner as an organization, seeded the same way as [`Repository::owner`].
    pub fn owner_organization(&self) -> Organization<'a> {
        let (name, id, info) = self.owner_seed();
        Organization(
            ApiNode::new(self.root(), ResourceKind::Organization { name })
                .with_database_id(id)
                .with_info(info),
        )
    }

    /// URL of a file on the raw content host.
    ///
    /// Without `branch` the default branch is taken from the metadata,
    /// which is fetched if not cached yet.
    pub fn raw_file_url(&self, path: &str, branch: Option<&str>) -> ApiResult<String> {
        let branch = match branch {
            Some(branch) => branch.to_string(),
            None => self
                .info()?
                .get("default_branch")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    ApiError::Unsupported(format!("{} has no default branch", self.full_name()))
                })?,
        };
        let (owner, name) = self.names();
        Ok(format!(
            "https://{}/{}/{}/{}/{}",
            USER_CONTENT_DOMAIN,
            owner,
            name,
            branch,
            path.trim_start_matches('/')
        ))
    }

    /// Fetches the README, at the root or under `path`, at `git_ref`.
    ///
    /// Supported renderings:
    ///
    /// | Media type | Result |
    /// |------------|--------|
    /// | `json` | metadata plus decoded `content` |
    /// | `raw`, `html` | the body as-is |
    /// | `raw-base64` | the body, base64-decoded |
    ///
    /// # Errors
    ///
    /// [`ApiError::Format`] for other media types or undecodable content.
    pub fn readme(
        &self,
        media: MediaType,
        path: Option<&str>,
        git_ref: Option<&str>,
    ) -> ApiResult<Readme> {
        if !matches!(
            media,
            MediaType::Json | MediaType::Raw | MediaType::Html | MediaType::RawBase64
        ) {
            return Err(ApiError::Format(format!(
                "README cannot be fetched as {}",
                media.name()
            )));
        }

        let endpoint = match path {
            Some(path) => format!("readme/{}", path.trim_matches('/')),
            None => "readme".to_string(),
        };
        let mut request = Request::get().accept(media);
        if let Some(git_ref) = git_ref {
            request = request.query("ref", git_ref);
        }

        let response = self.request(&endpoint, request)?;
        Readme::from_response(media, &response)
    }
}

/// A README as returned by [`Repository::readme`].
#[derive(Debug, Clone, PartialEq)]
pub struct Readme {
    /// The JSON metadata, only for the `json` rendering
    pub metadata: Option<Value>,
    /// Decoded content
    pub content: Vec<u8>,
}

impl Readme {
    fn from_response(media: MediaType, response: &RawResponse) -> ApiResult<Self> {
        match media {
            MediaType::Json => {
                let metadata: Value = response.json()?;
                let raw = metadata
                    .get("content")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let content = match metadata.get("encoding").and_then(Value::as_str) {
                    Some("base64") => decode_base64(raw)?,
                    _ => raw.as_bytes().to_vec(),
                };
                Ok(Self {
                    metadata: Some(metadata),
                    content,
                })
            }
            MediaType::RawBase64 => Ok(Self {
                metadata: None,
                content: decode_base64(&response.text())?,
            }),
            _ => Ok(Self {
                metadata: None,
                content: response.bytes().to_vec(),
            }),
        }
    }

    /// The content as UTF-8 text, if it is valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }
}

fn decode_base64(encoded: &str) -> ApiResult<Vec<u8>> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| ApiError::Format(format!("content is not base64: {}", e)))
}

impl GitHubPages<'_> {
    /// Enables Pages.
    ///
    /// `build_type` is `workflow` or `legacy`. A source is only sent when a
    /// branch or path is given.
    pub fn create(
        &self,
        branch: Option<&str>,
        path: Option<&str>,
        build_type: Option<&str>,
    ) -> ApiResult<Value> {
        let mut body = serde_json::Map::new();
        if let Some(build_type) = build_type {
            body.insert("build_type".to_string(), json!(build_type));
        }
        if branch.is_some() || path.is_some() {
            body.insert("source".to_string(), json!({"branch": branch, "path": path}));
        }
        self.request("", Request::new().method("POST").json(Value::Object(body)))?
            .json_or_null()
    }

    /// Disables Pages.
    pub fn delete(&self) -> ApiResult<()> {
        self.request("", Request::delete())?;
        Ok(())
    }

    /// Deploys an uploaded artifact.
    ///
    /// `version` is usually the commit SHA; `oidc_token` comes from the
    /// workflow's OIDC provider.
    pub fn deploy(
        &self,
        artifact_url: &str,
        version: &str,
        oidc_token: &str,
        environment: Option<&str>,
    ) -> ApiResult<Value> {
        self.request(
            "deployment",
            Request::new().method("POST").json(json!({
                "artifact_url": artifact_url,
                "pages_build_version": version,
                "oidc_token": oidc_token,
                "environment": environment.unwrap_or("github-pages"),
            })),
        )?
        .json()
    }
}
