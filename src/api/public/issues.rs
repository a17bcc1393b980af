//
//  gh-actions-client
//  api/public/issues.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issues of a repository.

use serde_json::{json, Value};

use super::repositories::Repository;
use crate::api::common::{ApiResult, MediaType, Request};
use crate::api::node::{resource_view, ResourceKind};

const TRANSFER_MUTATION: &str = "mutation ($ii: ID!, $ri: ID!) \
    {transferIssue(input: {issueId: $ii, repositoryId: $ri}) {issue {id}}}";

resource_view!(
    /// `issues/<number>/` of a repository.
    ///
    /// The metadata may be rendered as `json`, `text`, `html` or `full`;
    /// the body lands in `body`, `body_text` or `body_html` accordingly.
    Issue
);

impl Issue<'_> {
    /// The issue number.
    pub fn number(&self) -> u64 {
        match self.kind() {
            ResourceKind::Issue { number } => *number,
            _ => 0,
        }
    }

    /// The metadata rendered with `accept`.
    pub fn info_as(&self, accept: MediaType, fresh: bool) -> ApiResult<Value> {
        self.info_with(fresh, accept)
    }

    /// Adds a comment.
    pub fn comment(&self, body: &str) -> ApiResult<Value> {
        self.request("comments", Request::new().json(json!({"body": body})))?
            .json()
    }

    /// Replaces all labels.
    pub fn set_labels(&self, labels: &[&str]) -> ApiResult<Value> {
        self.request(
            "labels",
            Request::new().method("PUT").json(json!({"labels": labels})),
        )?
        .json()
    }

    /// Applies a partial update.
    pub fn patch(&self, changes: Value) -> ApiResult<Value> {
        self.request("", Request::new().method("PATCH").json(changes))?
            .json()
    }

    /// Closes the issue.
    pub fn close(&self) -> ApiResult<Value> {
        self.patch(json!({"state": "closed"}))
    }

    /// Reopens the issue.
    pub fn open(&self) -> ApiResult<Value> {
        self.patch(json!({"state": "open"}))
    }

    /// Deletes the issue.
    pub fn delete(&self) -> ApiResult<()> {
        self.request("", Request::delete())?;
        Ok(())
    }

    /// Locks the conversation, optionally with a reason such as `off-topic`.
    pub fn lock(&self, reason: Option<&str>) -> ApiResult<()> {
        let mut request = Request::new().method("PUT");
        if let Some(reason) = reason {
            request = request.json(json!({"lock_reason": reason}));
        }
        self.request("lock", request)?;
        Ok(())
    }

    /// Unlocks the conversation.
    pub fn unlock(&self) -> ApiResult<()> {
        self.request("lock", Request::delete())?;
        Ok(())
    }

    /// Moves the issue to another repository.
    ///
    /// Both node ids are resolved first, which may cost two GraphQL lookups.
    pub fn transfer(&self, target: &Repository<'_>) -> ApiResult<Value> {
        let issue_id = self.node_id()?;
        let repository_id = target.node_id()?;
        self.graphql(
            TRANSFER_MUTATION,
            json!({"ii": issue_id, "ri": repository_id}),
            &[],
        )
    }

    /// Adds a reaction such as `+1` or `rocket`.
    pub fn react(&self, content: &str) -> ApiResult<Value> {
        self.request(
            "reactions",
            Request::new().method("POST").json(json!({"content": content})),
        )?
        .json()
    }

    /// The issue timeline events.
    pub fn events(&self) -> ApiResult<Vec<Value>> {
        self.request("events", Request::get().preview("starfox"))?
            .json()
    }
}
