//
//  gh-actions-client
//  api/node.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Resource Nodes
//!
//! Every addressable resource is an [`ApiNode`]: a [`ResourceKind`] tag, a
//! reference to the dispatcher root and an optional reference to the parent
//! node. Paths are never built in one place. A node prepends its own prefix
//! to the relative path it was given and hands the call to its parent, or to
//! the root when it has none:
//!
//! ```text
//! root ── repos/octocat/hello/ ── issues/7/ ── "comments"
//!        └──────────── <base>repos/octocat/hello/issues/7/comments ──────┘
//! ```
//!
//! Typed views such as [`Repository`](crate::api::public::Repository) wrap a
//! node, deref to it, and add the operations that make sense for the kind.
//!
//! ## Caches
//!
//! A node memoises its numeric database id, the last fetched metadata and
//! the collections it has listed. The caches use `Cell`/`RefCell`, so nodes
//! are neither `Sync` nor meant to be shared across threads.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;

use serde_json::{json, Value};
use tracing::debug;

use super::client::{ApiClient, Pages};
use super::common::{
    collect_items, decode_node_id_as, encode_node_id, ApiError, ApiResult, MediaType, PageRange,
    RawResponse, Request,
};

const REPOSITORY_ID_QUERY: &str = "query($owner: String!, $repo: String!) \
    {repository(name: $repo, owner: $owner) {databaseId}}";

const ISSUE_ID_QUERY: &str = "query($owner: String!, $repo: String!, $no: Int!) \
    {repository(name: $repo, owner: $owner) {issue(number: $no) {databaseId}}}";

/// Media types an issue can be rendered with.
pub const ISSUE_MEDIA_TYPES: [MediaType; 4] = [
    MediaType::Json,
    MediaType::Text,
    MediaType::Html,
    MediaType::Full,
];

/// The closed set of resources a node can stand for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceKind {
    /// `users/<name>/`
    User {
        /// Login
        name: String,
    },
    /// `orgs/<name>/`
    Organization {
        /// Login
        name: String,
    },
    /// Key listings under a user (empty prefix)
    Keys,
    /// `repos/<owner>/<name>/`
    Repository {
        /// Owner login
        owner: String,
        /// Repository name
        name: String,
    },
    /// `issues/<number>/`
    Issue {
        /// Issue number within the repository
        number: u64,
    },
    /// `pages/`
    Pages,
    /// `actions/`
    Actions,
    /// `artifacts/`
    Artifacts,
    /// `<id>/` under artifacts
    Artifact {
        /// Artifact id
        id: u64,
    },
    /// `runs/`
    Runs,
    /// `<id>/` under runs
    WorkflowRun {
        /// Run id
        id: u64,
    },
    /// `secrets/`
    Secrets,
    /// `workflows/`
    Workflows,
    /// `<id>/` under workflows
    Workflow {
        /// Workflow id
        id: u64,
    },
    /// `pipelines/` on the pipelines service
    Pipelines,
    /// `workflows/<run>/` on the pipelines service
    PipelineRun {
        /// Workflow run id
        run_id: u64,
    },
    /// `artifacts` under a pipeline run
    PipelineArtifacts,
    /// `resources/` on the pipelines service
    Resources,
    /// `Containers/`
    Containers,
    /// `<id>/` under containers
    Container {
        /// Container id
        id: u64,
    },
    /// `artifactcache/` on the cache service
    Cache,
}

impl ResourceKind {
    /// The path segment this kind contributes, usually ending in `/`.
    pub fn prefix(&self) -> String {
        match self {
            Self::User { name } => format!("users/{}/", name),
            Self::Organization { name } => format!("orgs/{}/", name),
            Self::Keys => String::new(),
            Self::Repository { owner, name } => format!("repos/{}/{}/", owner, name),
            Self::Issue { number } => format!("issues/{}/", number),
            Self::Pages => "pages/".to_string(),
            Self::Actions => "actions/".to_string(),
            Self::Artifacts => "artifacts/".to_string(),
            Self::Runs => "runs/".to_string(),
            Self::Secrets => "secrets/".to_string(),
            Self::Workflows => "workflows/".to_string(),
            Self::Artifact { id } | Self::WorkflowRun { id } | Self::Workflow { id } => {
                format!("{}/", id)
            }
            Self::Pipelines => "pipelines/".to_string(),
            Self::PipelineRun { run_id } => format!("workflows/{}/", run_id),
            Self::PipelineArtifacts => "artifacts/".to_string(),
            Self::Resources => "resources/".to_string(),
            Self::Containers => "Containers/".to_string(),
            Self::Container { id } => format!("{}/", id),
            Self::Cache => "artifactcache/".to_string(),
        }
    }

    /// The type name used inside node ids.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::User { .. } => "User",
            Self::Organization { .. } => "Organization",
            Self::Keys => "Keys",
            Self::Repository { .. } => "Repository",
            Self::Issue { .. } => "Issue",
            Self::Pages => "Pages",
            Self::Actions => "Actions",
            Self::Artifacts => "Artifacts",
            Self::Artifact { .. } => "Artifact",
            Self::Runs => "Runs",
            Self::WorkflowRun { .. } => "WorkflowRun",
            Self::Secrets => "Secrets",
            Self::Workflows => "Workflows",
            Self::Workflow { .. } => "Workflow",
            Self::Pipelines => "Pipelines",
            Self::PipelineRun { .. } => "PipelineRun",
            Self::PipelineArtifacts => "PipelineArtifacts",
            Self::Resources => "Resources",
            Self::Containers => "Containers",
            Self::Container { .. } => "Container",
            Self::Cache => "Cache",
        }
    }

    /// Whether `GET <prefix>` returns the resource's metadata.
    pub fn is_info_fetchable(&self) -> bool {
        matches!(
            self,
            Self::User { .. }
                | Self::Organization { .. }
                | Self::Repository { .. }
                | Self::Issue { .. }
                | Self::Artifact { .. }
                | Self::WorkflowRun { .. }
                | Self::Workflow { .. }
        )
    }

    /// The login of a user or organization.
    pub fn login(&self) -> Option<&str> {
        match self {
            Self::User { name } | Self::Organization { name } => Some(name),
            _ => None,
        }
    }

    /// The database id carried by the kind itself, if any.
    pub fn intrinsic_id(&self) -> Option<u64> {
        match self {
            Self::Artifact { id }
            | Self::WorkflowRun { id }
            | Self::Workflow { id }
            | Self::Container { id } => Some(*id),
            _ => None,
        }
    }
}

/// A resource in a tree rooted at an [`ApiClient`].
///
/// Created on demand by factory methods on the parent and dropped when no
/// longer referenced. The node borrows its parent, so children cannot
/// outlive it.
pub struct ApiNode<'a> {
    root: &'a ApiClient,
    parent: Option<&'a ApiNode<'a>>,
    kind: ResourceKind,
    database_id: Cell<Option<u64>>,
    info: RefCell<Option<Value>>,
    listings: RefCell<BTreeMap<String, Vec<Value>>>,
}

impl<'a> ApiNode<'a> {
    /// Creates a node attached directly to the root.
    pub fn new(root: &'a ApiClient, kind: ResourceKind) -> Self {
        Self {
            root,
            parent: None,
            kind,
            database_id: Cell::new(None),
            info: RefCell::new(None),
            listings: RefCell::new(BTreeMap::new()),
        }
    }

    /// Creates a child of this node.
    pub fn child(&self, kind: ResourceKind) -> ApiNode<'_> {
        ApiNode {
            root: self.root,
            parent: Some(self),
            kind,
            database_id: Cell::new(None),
            info: RefCell::new(None),
            listings: RefCell::new(BTreeMap::new()),
        }
    }

    /// Seeds the database id cache.
    pub fn with_database_id(self, id: Option<u64>) -> Self {
        self.database_id.set(id);
        self
    }

    /// Seeds the metadata cache.
    pub fn with_info(self, info: Option<Value>) -> Self {
        *self.info.borrow_mut() = info;
        self
    }

    /// The dispatcher at the root of the tree.
    pub fn root(&self) -> &'a ApiClient {
        self.root
    }

    /// The parent node, `None` for nodes attached to the root.
    pub fn parent(&self) -> Option<&'a ApiNode<'a>> {
        self.parent
    }

    /// What this node stands for.
    pub fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    /// Issues a request relative to this node.
    pub fn request(&self, path: &str, request: Request) -> ApiResult<RawResponse> {
        let full = format!("{}{}", self.kind.prefix(), path);
        match self.parent {
            Some(parent) => parent.request(&full, request),
            None => self.root.request(&full, request),
        }
    }

    /// Walks a paginated endpoint relative to this node.
    pub fn request_pages(
        &self,
        path: &str,
        request: Request,
        pages: impl Into<PageRange>,
    ) -> ApiResult<Pages<'a>> {
        self.pages_from(path, request, pages.into())
    }

    fn pages_from(&self, path: &str, request: Request, pages: PageRange) -> ApiResult<Pages<'a>> {
        let full = format!("{}{}", self.kind.prefix(), path);
        match self.parent {
            Some(parent) => parent.pages_from(&full, request, pages),
            None => self.root.request_pages(&full, request, pages),
        }
    }

    /// Sends a GraphQL query through the root.
    pub fn graphql(&self, query: &str, variables: Value, previews: &[&str]) -> ApiResult<Value> {
        match self.parent {
            Some(parent) => parent.graphql(query, variables, previews),
            None => self.root.graphql(query, variables, previews),
        }
    }

    /// Cached metadata, fetched on first use.
    pub fn info(&self) -> ApiResult<Value> {
        self.info_with(false, MediaType::Json)
    }

    /// Refetches the metadata, replacing the cache.
    pub fn refresh_info(&self) -> ApiResult<Value> {
        self.info_with(true, MediaType::Json)
    }

    /// Metadata rendered with a specific media type.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unsupported`] for kinds without a metadata endpoint
    /// - [`ApiError::Format`] when an issue is asked for a rendering it
    ///   does not support
    pub fn info_with(&self, fresh: bool, accept: MediaType) -> ApiResult<Value> {
        if !self.kind.is_info_fetchable() {
            return Err(ApiError::Unsupported(format!(
                "{} has no metadata endpoint",
                self.kind.type_name()
            )));
        }
        if matches!(self.kind, ResourceKind::Issue { .. }) && !ISSUE_MEDIA_TYPES.contains(&accept)
        {
            return Err(ApiError::Format(format!(
                "issues cannot be rendered as {}",
                accept.name()
            )));
        }
        if !fresh {
            if let Some(info) = self.info.borrow().as_ref() {
                return Ok(info.clone());
            }
        }
        self.fetch_info(accept)
    }

    /// Metadata seeded or fetched earlier, without any request.
    pub fn cached_info(&self) -> Option<Value> {
        self.info.borrow().clone()
    }

    fn fetch_info(&self, accept: MediaType) -> ApiResult<Value> {
        let info: Value = self.request("", Request::get().accept(accept))?.json()?;
        if let Some(id) = info.get("id").and_then(Value::as_u64) {
            self.database_id.set(Some(id));
        }
        *self.info.borrow_mut() = Some(info.clone());
        Ok(info)
    }

    /// The numeric database id, resolved once and memoised.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unsupported`] for kinds that have no id, or any error
    /// raised while resolving it.
    pub fn database_id(&self) -> ApiResult<u64> {
        if let Some(id) = self.database_id.get() {
            debug!(kind = self.kind.type_name(), id, "database id cache hit");
            return Ok(id);
        }

        debug!(kind = self.kind.type_name(), "resolving database id");
        let id = self.resolve_database_id()?;
        self.database_id.set(Some(id));
        Ok(id)
    }

    /// Overrides the cached database id.
    pub fn set_database_id(&self, id: u64) {
        self.database_id.set(Some(id));
    }

    fn resolve_database_id(&self) -> ApiResult<u64> {
        if let Some(id) = self.kind.intrinsic_id() {
            return Ok(id);
        }

        match &self.kind {
            ResourceKind::Repository { owner, name } => {
                let doc = self.graphql(
                    REPOSITORY_ID_QUERY,
                    json!({"owner": owner, "repo": name}),
                    &[],
                )?;
                graphql_u64(&doc, "/data/repository/databaseId")
            }
            ResourceKind::Issue { number } => {
                let Some(ResourceKind::Repository { owner, name }) = self.parent.map(|p| &p.kind)
                else {
                    return Err(ApiError::Unsupported(
                        "an issue needs its repository to resolve its id".to_string(),
                    ));
                };
                let doc = self.graphql(
                    ISSUE_ID_QUERY,
                    json!({"owner": owner, "repo": name, "no": number}),
                    &[],
                )?;
                graphql_u64(&doc, "/data/repository/issue/databaseId")
            }
            kind if kind.is_info_fetchable() => {
                let info = self.fetch_info(MediaType::Json)?;
                Ok(serde_json::from_value(info.get("id").cloned().unwrap_or(Value::Null))?)
            }
            kind => Err(ApiError::Unsupported(format!(
                "{} has no database id",
                kind.type_name()
            ))),
        }
    }

    /// The opaque node id, derived from the database id and the type name.
    pub fn node_id(&self) -> ApiResult<String> {
        encode_node_id(self.database_id()?, self.kind.type_name())
    }

    /// Sets the database id from a node id.
    ///
    /// # Errors
    ///
    /// [`ApiError::TypeMismatch`] when the id belongs to another kind, or
    /// [`ApiError::Format`] when it is malformed.
    pub fn set_node_id(&self, node_id: &str) -> ApiResult<()> {
        let id = decode_node_id_as(node_id, self.kind.type_name())?;
        self.database_id.set(Some(id));
        Ok(())
    }

    /// Lists every item of a paginated collection under this node.
    pub fn list_all(&self, path: &str) -> ApiResult<Vec<Value>> {
        collect_items(self.request_pages(path, Request::get(), PageRange::all())?)
    }

    /// Like [`ApiNode::list_all`], but remembers the result per path.
    pub fn cached_listing(&self, path: &str, fresh: bool) -> ApiResult<Vec<Value>> {
        if !fresh {
            if let Some(items) = self.listings.borrow().get(path) {
                return Ok(items.clone());
            }
        }
        let items = self.list_all(path)?;
        self.listings
            .borrow_mut()
            .insert(path.to_string(), items.clone());
        Ok(items)
    }
}

impl fmt::Debug for ApiNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiNode")
            .field("kind", &self.kind)
            .field("database_id", &self.database_id.get())
            .field("parent", &self.parent.map(|p| &p.kind))
            .finish()
    }
}

fn graphql_u64(doc: &Value, pointer: &str) -> ApiResult<u64> {
    match doc.pointer(pointer) {
        Some(value) if !value.is_null() => Ok(serde_json::from_value(value.clone())?),
        _ => {
            let reason = doc
                .pointer("/errors/0/message")
                .and_then(Value::as_str)
                .unwrap_or("field missing from reply");
            Err(ApiError::Format(format!(
                "GraphQL lookup of {} failed: {}",
                pointer, reason
            )))
        }
    }
}

/// Declares a typed view over an [`ApiNode`].
macro_rules! resource_view {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name<'a>(pub(crate) $crate::api::node::ApiNode<'a>);

        impl<'a> std::ops::Deref for $name<'a> {
            type Target = $crate::api::node::ApiNode<'a>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
    };
}

pub(crate) use resource_view;

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new("https://api.example.com").unwrap()
    }

    #[test]
    fn test_prefixes() {
        let repo = ResourceKind::Repository {
            owner: "o".to_string(),
            name: "r".to_string(),
        };
        assert_eq!(repo.prefix(), "repos/o/r/");
        assert_eq!(ResourceKind::Issue { number: 7 }.prefix(), "issues/7/");
        assert_eq!(ResourceKind::Keys.prefix(), "");
        assert_eq!(ResourceKind::PipelineRun { run_id: 9 }.prefix(), "workflows/9/");
    }

    #[test]
    fn test_intrinsic_ids_need_no_request() {
        let client = client();
        let actions = ApiNode::new(&client, ResourceKind::Actions);
        let run = actions.child(ResourceKind::WorkflowRun { id: 55 });
        assert_eq!(run.database_id().unwrap(), 55);
        assert_eq!(run.node_id().unwrap(), encode_node_id(55, "WorkflowRun").unwrap());
    }

    #[test]
    fn test_collections_have_no_id() {
        let client = client();
        let secrets = ApiNode::new(&client, ResourceKind::Secrets);
        assert!(matches!(secrets.database_id(), Err(ApiError::Unsupported(_))));
        assert!(matches!(secrets.info(), Err(ApiError::Unsupported(_))));
    }

    #[test]
    fn test_set_node_id_checks_type() {
        let client = client();
        let user = ApiNode::new(
            &client,
            ResourceKind::User {
                name: "octocat".to_string(),
            },
        );
        user.set_node_id("MDQ6VXNlcjU4MzIzMQ==").unwrap();
        assert_eq!(user.database_id().unwrap(), 583231);

        let org_id = encode_node_id(1, "Organization").unwrap();
        assert!(matches!(
            user.set_node_id(&org_id),
            Err(ApiError::TypeMismatch { .. })
        ));
        assert_eq!(user.database_id().unwrap(), 583231);
    }

    #[test]
    fn test_issue_rejects_unsupported_renderings() {
        let client = client();
        let repo = ApiNode::new(
            &client,
            ResourceKind::Repository {
                owner: "o".to_string(),
                name: "r".to_string(),
            },
        );
        let issue = repo.child(ResourceKind::Issue { number: 1 });
        assert!(matches!(
            issue.info_with(false, MediaType::Diff),
            Err(ApiError::Format(_))
        ));
    }

    #[test]
    fn test_graphql_u64_reports_errors() {
        let doc = json!({"data": null, "errors": [{"message": "Could not resolve"}]});
        match graphql_u64(&doc, "/data/repository/databaseId") {
            Err(ApiError::Format(msg)) => assert!(msg.contains("Could not resolve")),
            other => panic!("unexpected: {other:?}"),
        }
        let doc = json!({"data": {"repository": {"databaseId": 12}}});
        assert_eq!(graphql_u64(&doc, "/data/repository/databaseId").unwrap(), 12);
    }
}
